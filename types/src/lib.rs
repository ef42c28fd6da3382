//! Type-mapping tables for schemabridge
//!
//! This crate provides the dialect-specific tables that translate between
//! database column types and host-language (C#) types:
//!
//! - [`Dialect`] - Database dialect enum (MySQL, SQL Server)
//! - [`HostType`] - The host scalar type vocabulary
//! - [`TypeMap`] - One immutable bidirectional table per dialect
//!
//! # Features
//!
//! - `serde` - Enable serde serialization/deserialization of the vocabulary types

mod dialect;
mod error;
mod host;
mod mysql;
mod sqlserver;
mod type_map;

pub use dialect::{Dialect, DialectParseError};
pub use error::UnsupportedTypeError;
pub use host::{HostType, HostTypeRef};
pub use type_map::{LengthKind, TypeMap, TypeMapping};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{Dialect, HostType, HostTypeRef, TypeMap, UnsupportedTypeError};
}
