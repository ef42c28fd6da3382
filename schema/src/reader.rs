//! Table sources: the `SchemaReader` port and the JSON schema snapshot

use crate::{Column, Table};
use schemabridge_types::Dialect;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors raised while loading or saving a schema snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version {found} (expected {expected})", expected = SNAPSHOT_VERSION)]
    Version { found: u32 },

    #[error("table not found: {0}")]
    TableNotFound(String),
}

/// Source of database-origin tables.
///
/// Connection mechanics are the implementor's concern; consumers only see
/// the [`Table`] / [`Column`] shape.
pub trait SchemaReader {
    type Error;

    /// Table shells: name, schema and description, without columns
    fn list_tables(&self) -> Result<Vec<Table>, Self::Error>;

    fn list_columns(&self, table_name: &str) -> Result<Vec<Column>, Self::Error>;

    /// Full tables, columns included, in `list_tables` order
    fn read_tables(&self) -> Result<Vec<Table>, Self::Error> {
        self.list_tables()?
            .into_iter()
            .map(|mut table| {
                table.columns = self.list_columns(&table.name)?;
                Ok(table)
            })
            .collect()
    }
}

/// A list of tables persisted as JSON
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    pub version: u32,
    /// Dialect the `dbType` names belong to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
    pub tables: Vec<Table>,
}

impl Default for SchemaSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            dialect: None,
            tables: Vec::new(),
        }
    }
}

impl SchemaSnapshot {
    pub fn new(dialect: Dialect, tables: Vec<Table>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            dialect: Some(dialect),
            tables,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Save the snapshot to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        std::fs::write(path, self.to_json()?).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// [`SchemaReader`] over a loaded [`SchemaSnapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    snapshot: SchemaSnapshot,
}

impl SnapshotReader {
    pub fn new(snapshot: SchemaSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn open(path: &Path) -> Result<Self, SnapshotError> {
        SchemaSnapshot::load(path).map(Self::new)
    }

    #[must_use]
    pub fn dialect(&self) -> Option<Dialect> {
        self.snapshot.dialect
    }
}

impl SchemaReader for SnapshotReader {
    type Error = SnapshotError;

    fn list_tables(&self) -> Result<Vec<Table>, Self::Error> {
        Ok(self
            .snapshot
            .tables
            .iter()
            .map(|t| Table {
                name: t.name.clone(),
                schema: t.schema.clone(),
                description: t.description.clone(),
                columns: Vec::new(),
            })
            .collect())
    }

    fn list_columns(&self, table_name: &str) -> Result<Vec<Column>, Self::Error> {
        self.snapshot
            .tables
            .iter()
            .find(|t| t.name == table_name)
            .map(|t| t.columns.clone())
            .ok_or_else(|| SnapshotError::TableNotFound(table_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot::new(
            Dialect::MySql,
            vec![
                Table::new("users")
                    .with_column(Column::new("Id", "int").primary_key().not_null())
                    .with_column(Column::new("Name", "varchar").size(50)),
                Table::new("posts").with_column(Column::new("Id", "int").primary_key().not_null()),
            ],
        )
    }

    #[test]
    fn test_read_tables_assembles_columns() {
        let reader = SnapshotReader::new(snapshot());
        let shells = reader.list_tables().unwrap();
        assert!(shells.iter().all(|t| t.columns.is_empty()));

        let tables = reader.read_tables().unwrap();
        assert_eq!(tables, snapshot().tables);
    }

    #[test]
    fn test_missing_table() {
        let reader = SnapshotReader::new(snapshot());
        assert!(matches!(
            reader.list_columns("nope"),
            Err(SnapshotError::TableNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        snapshot().save(&path).unwrap();

        let reader = SnapshotReader::open(&path).unwrap();
        assert_eq!(reader.dialect(), Some(Dialect::MySql));
        assert_eq!(reader.read_tables().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = SchemaSnapshot::from_json(r#"{"version": 9, "tables": []}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Version { found: 9 }));
    }
}
