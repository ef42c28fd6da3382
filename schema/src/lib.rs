//! Canonical schema model for schemabridge
//!
//! - [`Table`] / [`Column`] / [`DefaultValue`] - the dialect-neutral table description
//! - [`NameConverter`] - model <-> table naming policy
//! - [`SchemaReader`] - port for database-origin tables, with a JSON [`SnapshotReader`]

mod naming;
mod reader;
mod table;

pub use naming::{DefaultNameConverter, NameConverter, PluralNameConverter};
pub use reader::{SNAPSHOT_VERSION, SchemaReader, SchemaSnapshot, SnapshotError, SnapshotReader};
pub use table::{Column, DefaultValue, Table};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{Column, DefaultValue, NameConverter, SchemaReader, Table};
}
