//! schemabridge CLI - Command-line interface for model extraction and code generation
//!
//! This crate provides the `schemabridge` binary, driven by an optional
//! `schemabridge.toml` configuration file.
//!
//! # Quick Start
//!
//! 1. Run `schemabridge init --dialect mysql` to create a `schemabridge.toml`
//! 2. Run `schemabridge extract Models/*.cs --out schema.json`
//! 3. Run `schemabridge ddl --schema schema.json` or `schemabridge model --schema schema.json --out Generated`
//!
//! # Configuration
//!
//! ```toml
//! dialect = "sqlserver"
//! naming = "default"
//!
//! [model]
//! namespace = "Blog.Models"
//! emit_annotations = true
//!
//! [ddl]
//! include_descriptions = true
//! ```
//!
//! # Commands
//!
//! - `schemabridge init` - Create a new schemabridge.toml configuration file
//! - `schemabridge extract` - Model source files -> JSON schema snapshot
//! - `schemabridge model` - Schema snapshot -> one model source file per table
//! - `schemabridge ddl` - Schema snapshot -> `CREATE TABLE` / `ALTER TABLE` SQL

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use config::{Config, Error as ConfigError, Naming};
pub use error::CliError;
