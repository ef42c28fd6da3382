//! Error types for the CLI

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Schema snapshot could not be read or written
    #[error(transparent)]
    Snapshot(#[from] schemabridge_schema::SnapshotError),

    /// Extraction or rendering failed
    #[error(transparent)]
    Codegen(#[from] schemabridge_codegen::Error),

    /// The extracted source declared no model types
    #[error("No model types found in: {0}")]
    NoModels(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
