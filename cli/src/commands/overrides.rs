//! Command-line overrides layered over `schemabridge.toml`

use schemabridge_codegen::GenerateOptions;
use schemabridge_schema::{SchemaReader, SnapshotReader, Table};
use schemabridge_types::Dialect;
use std::path::Path;

use crate::config::{Config, Naming};
use crate::error::CliError;

/// Flags that override the `[model]` section
#[derive(Debug, Clone, Default)]
pub struct ModelOverrides {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub annotations: bool,
    pub encapsulated: bool,
    pub nullable: bool,
    pub file_scoped: bool,
    pub implicit_imports: bool,
}

impl ModelOverrides {
    /// Config options with every given flag applied; switches only turn features on
    pub fn apply(&self, mut options: GenerateOptions) -> GenerateOptions {
        if let Some(namespace) = &self.namespace {
            options.namespace = namespace.clone();
        }
        if let Some(prefix) = &self.prefix {
            options.type_prefix = prefix.clone();
        }
        if let Some(suffix) = &self.suffix {
            options.type_suffix = suffix.clone();
        }
        options.emit_annotations |= self.annotations;
        options.emit_encapsulated_fields |= self.encapsulated;
        options.nullable_types_enabled |= self.nullable;
        options.file_scoped_namespace |= self.file_scoped;
        options.implicit_imports_enabled |= self.implicit_imports;
        options
    }
}

/// Flag, then the snapshot's own dialect, then the config file
pub fn resolve_dialect(
    config: &Config,
    override_dialect: Option<Dialect>,
    snapshot_dialect: Option<Dialect>,
) -> Dialect {
    override_dialect
        .or(snapshot_dialect)
        .unwrap_or(config.dialect)
}

pub fn resolve_naming(config: &Config, override_naming: Option<Naming>) -> Naming {
    override_naming.unwrap_or(config.naming)
}

/// Tables and dialect of a schema snapshot file
pub fn read_snapshot(path: &Path) -> Result<(Vec<Table>, Option<Dialect>), CliError> {
    let reader = SnapshotReader::open(path)?;
    let tables = reader.read_tables()?;
    Ok((tables, reader.dialect()))
}
