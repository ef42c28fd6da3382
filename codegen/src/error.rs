//! Error types for introspection and rendering

use schemabridge_types::UnsupportedTypeError;

/// Errors raised by [`ModelIntrospector`](crate::ModelIntrospector),
/// [`ModelGenerator`](crate::ModelGenerator) and [`DdlGenerator`](crate::DdlGenerator)
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A type name the dialect's mapping table does not cover
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    /// The model source could not be resolved; carries every diagnostic
    #[error("Compile error:\n{}", .diagnostics.join("\n"))]
    SourceCompilation { diagnostics: Vec<String> },

    /// A required input is missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
