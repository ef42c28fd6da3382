//! Model introspection and code generation for schemabridge
//!
//! This crate turns C# model source into canonical [`Table`](schemabridge_schema::Table)s
//! and renders tables back out:
//!
//! - [`ModelIntrospector`] - model source -> tables, through a [`SourceIntrospector`] port
//! - [`DeclarationScanner`] - the built-in source introspector (lexer + declaration parser)
//! - [`ModelGenerator`] - table -> model class source
//! - [`DdlGenerator`] - table -> `CREATE TABLE` or `ALTER TABLE` SQL
//!
//! # Round trip
//!
//! ```
//! use schemabridge_codegen::prelude::*;
//! use schemabridge_types::{Dialect, TypeMap};
//!
//! let dialect = TypeMap::for_dialect(Dialect::MySql);
//! let source = "public record Post(int Id, string Title);";
//!
//! let tables = ModelIntrospector::new().extract(dialect, &[source]).unwrap();
//! let code = ModelGenerator::new()
//!     .render(&tables[0], &GenerateOptions::default(), dialect)
//!     .unwrap();
//! let sql = DdlGenerator::new().render(&tables[0], true, dialect).unwrap();
//!
//! assert!(code.contains("public int Id { get; set; }"));
//! assert!(sql.starts_with("CREATE TABLE `Post`("));
//! ```
//!
//! # Features
//!
//! - `tracing` - Emit `tracing` events from extraction and rendering

mod ddl;
mod error;
mod introspect;
mod model;
mod options;
mod scanner;
mod tracing;

pub use ddl::{DdlGenerator, DdlOptions};
pub use error::{Error, Result};
pub use introspect::{
    Literal, MemberType, Metadata, MetadataArgument, MetadataExt, ModelIntrospector, Nullability,
    ReferenceSet, ResolveRequest, ResolvedMember, ResolvedType, STANDARD_ANNOTATIONS,
    SourceIntrospector, TypeKind, attribute_name, detect_nullable_context, merge_sources,
};
pub use model::ModelGenerator;
pub use options::{DEFAULT_IMPLICIT_IMPORTS, GenerateOptions};
pub use scanner::{DeclarationScanner, Diagnostic, LineIndex, Located};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{
        DdlGenerator, DdlOptions, DeclarationScanner, Error, GenerateOptions, ModelGenerator,
        ModelIntrospector, Result, SourceIntrospector,
    };
}
