//! # schemabridge
//!
//! Bidirectional mapping between relational table schemas and C# model classes,
//! for MySQL/MariaDB and SQL Server.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemabridge::prelude::*;
//!
//! # fn main() -> schemabridge::Result<()> {
//! let map = TypeMap::for_dialect(Dialect::SqlServer);
//!
//! let users = Table::new("tabUser")
//!     .with_description("Registered users")
//!     .with_column(Column::new("Id", "int").primary_key())
//!     .with_column(Column::new("UserName", "nvarchar").size(50).not_null());
//!
//! let model = ModelGenerator::new().render(&users, &GenerateOptions::default(), map)?;
//! let ddl = DdlGenerator::new().render(&users, true, map)?;
//!
//! assert!(model.contains("public class User"));
//! assert!(ddl.contains("[UserName] NVARCHAR(50) NOT NULL"));
//!
//! // ...and back again
//! let tables = ModelIntrospector::new().extract(map, &[model])?;
//! assert_eq!(tables[0].name, "User");
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate                   | Contents                                         |
//! |-------------------------|--------------------------------------------------|
//! | `schemabridge-types`    | dialects and database <-> host type maps         |
//! | `schemabridge-schema`   | tables, columns, naming, schema snapshots        |
//! | `schemabridge-codegen`  | model introspection, model and DDL generation    |
//! | `schemabridge-cli`      | the `schemabridge` command-line tool             |

pub use schemabridge_codegen as codegen;
pub use schemabridge_schema as schema;
pub use schemabridge_types as types;

pub use schemabridge_codegen::{Error, Result};

/// Everything needed to extract, render and map tables
pub mod prelude {
    pub use schemabridge_codegen::prelude::*;
    pub use schemabridge_schema::prelude::*;
    pub use schemabridge_schema::{
        DefaultNameConverter, PluralNameConverter, SchemaSnapshot, SnapshotReader,
    };
    pub use schemabridge_types::prelude::*;
}
