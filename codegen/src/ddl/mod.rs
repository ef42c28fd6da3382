//! Canonical table -> DDL
//!
//! One generator, one renderer per dialect. A full create emits a single
//! `CREATE TABLE`; the alter form adds the same columns to an existing table.

mod mysql;
mod sqlserver;

use crate::{Error, Result};
use schemabridge_schema::{Column, DefaultValue, Table};
use schemabridge_types::{Dialect, LengthKind, TypeMap, TypeMapping, UnsupportedTypeError};
use serde::{Deserialize, Serialize};

/// Options for one DDL rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DdlOptions {
    /// `CREATE TABLE` when set, `ALTER TABLE ... ADD` statements otherwise
    pub full_create: bool,
    /// Emit table and column descriptions
    pub include_descriptions: bool,
}

impl Default for DdlOptions {
    fn default() -> Self {
        Self {
            full_create: true,
            include_descriptions: true,
        }
    }
}

/// DDL generator for MySQL and SQL Server
///
/// # Examples
///
/// ```
/// use schemabridge_codegen::DdlGenerator;
/// use schemabridge_schema::{Column, Table};
/// use schemabridge_types::{Dialect, TypeMap};
///
/// let table = Table::new("Post")
///     .with_column(Column::new("Id", "int").primary_key().not_null())
///     .with_column(Column::new("Title", "nvarchar").size(200));
/// let sql = DdlGenerator::new()
///     .render(&table, true, TypeMap::for_dialect(Dialect::SqlServer))
///     .unwrap();
/// assert!(sql.starts_with("CREATE TABLE [Post]("));
/// assert!(sql.contains("[Title] NVARCHAR(200) NULL"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DdlGenerator {
    /// Whether to include descriptions
    pub include_descriptions: bool,
}

impl Default for DdlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DdlGenerator {
    pub fn new() -> Self {
        Self {
            include_descriptions: true,
        }
    }

    pub fn with_descriptions(mut self, include_descriptions: bool) -> Self {
        self.include_descriptions = include_descriptions;
        self
    }

    /// Render `table` as a full create or as an alter delta
    pub fn render(&self, table: &Table, full_create: bool, dialect: &TypeMap) -> Result<String> {
        self.render_with(
            table,
            &DdlOptions {
                full_create,
                include_descriptions: self.include_descriptions,
            },
            dialect,
        )
    }

    /// Render `table` with explicit options
    pub fn render_with(
        &self,
        table: &Table,
        options: &DdlOptions,
        dialect: &TypeMap,
    ) -> Result<String> {
        if table.name.trim().is_empty() {
            return Err(Error::InvalidArgument("table name is empty".to_string()));
        }
        if table.columns.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "table `{}` has no columns",
                table.name
            )));
        }

        let columns = table
            .columns
            .iter()
            .map(|column| ColumnDef::resolve(column, dialect))
            .collect::<Result<Vec<_>>>()?;
        let ddl = TableDdl {
            table,
            columns,
            include_descriptions: options.include_descriptions,
        };

        let statements = match (dialect.dialect(), options.full_create) {
            (Dialect::SqlServer, true) => sqlserver::create_table(&ddl),
            (Dialect::SqlServer, false) => sqlserver::alter_table(&ddl),
            (Dialect::MySql, true) => mysql::create_table(&ddl),
            (Dialect::MySql, false) => mysql::alter_table(&ddl),
        };

        crate::schemabridge_trace!(
            "render_ddl",
            table = table.name.as_str(),
            dialect = dialect.dialect().as_str(),
            full_create = options.full_create,
            statements = statements.len(),
        );
        Ok(statements.join("\n"))
    }
}

/// A table whose column types are resolved against the dialect
struct TableDdl<'a> {
    table: &'a Table,
    columns: Vec<ColumnDef<'a>>,
    include_descriptions: bool,
}

impl TableDdl<'_> {
    fn primary_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .map(|c| c.column)
            .filter(|c| c.is_primary_key)
    }

    fn description(&self) -> Option<&str> {
        self.table
            .description_text()
            .filter(|_| self.include_descriptions)
    }

    fn column_description<'c>(&self, column: &'c Column) -> Option<&'c str> {
        column
            .description_text()
            .filter(|_| self.include_descriptions)
    }
}

struct ColumnDef<'a> {
    column: &'a Column,
    mapping: &'static TypeMapping,
}

impl<'a> ColumnDef<'a> {
    fn resolve(column: &'a Column, dialect: &TypeMap) -> Result<Self> {
        let mapping = dialect
            .mapping(&column.db_type)
            .ok_or_else(|| UnsupportedTypeError::DbType {
                dialect: dialect.dialect(),
                db_type: column.db_type.clone(),
            })?;
        Ok(Self { column, mapping })
    }

    /// Whether the declared type already carries its own arguments
    fn has_arguments(&self) -> bool {
        self.column.db_type.contains('(')
    }

    /// Upper-cased declared type, whitespace collapsed
    fn declared_type(&self) -> String {
        self.column
            .db_type
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }

    /// Column size, or the dialect default when none was given
    fn size(&self) -> i64 {
        if self.column.size != 0 {
            self.column.size
        } else {
            self.mapping.default_size
        }
    }

    fn length(&self) -> LengthKind {
        if self.has_arguments() {
            LengthKind::None
        } else {
            self.mapping.length
        }
    }

    /// Primary key columns are never nullable
    fn nullable(&self) -> bool {
        self.column.is_nullable && !self.column.is_primary_key
    }
}

/// Scale used for every `DECIMAL(p,s)`
const DECIMAL_SCALE: i64 = 2;

fn decimal(name: &str, precision: i64, max_precision: i64) -> String {
    format!(
        "{name}({},{DECIMAL_SCALE})",
        precision.clamp(DECIMAL_SCALE, max_precision)
    )
}

/// SQL literal for a column default; `national` prefixes strings with `N`
fn default_to_sql(value: &DefaultValue, national: bool) -> String {
    match value {
        DefaultValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        DefaultValue::Integer(i) => i.to_string(),
        DefaultValue::Float(f) => f.to_string(),
        DefaultValue::Text(s) => {
            let prefix = if national { "N" } else { "" };
            format!("{prefix}{}", quote_string(s))
        }
    }
}

fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{QuickCheck, TestResult};

    fn users() -> Table {
        Table::new("tabUser111")
            .with_description("users")
            .with_column(
                Column::new("Id", "int")
                    .primary_key()
                    .not_null()
                    .size(4)
                    .description("主键"),
            )
            .with_column(Column::new("UserName", "VARCHAR").not_null().size(50))
            .with_column(Column::new("NickName", "VARCHAR").size(50))
            .with_column(Column::new("IsAdmin", "bit").size(1).default_value(false))
            .with_column(Column::new("CreatedTime", "DateTime").not_null().size(8))
    }

    #[test]
    fn test_create_differs_from_alter() {
        for dialect in Dialect::ALL {
            let map = TypeMap::for_dialect(*dialect);
            let generator = DdlGenerator::new();
            let create = generator.render(&users(), true, map).unwrap();
            let alter = generator.render(&users(), false, map).unwrap();
            assert!(!create.is_empty());
            assert!(!alter.is_empty());
            assert_ne!(create, alter, "{dialect}");
        }
    }

    #[test]
    fn test_invalid_tables() {
        let map = TypeMap::for_dialect(Dialect::MySql);
        let err = DdlGenerator::new()
            .render(&Table::new("  "), true, map)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = DdlGenerator::new()
            .render(&Table::new("Empty"), false, map)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_type() {
        let table = Table::new("Shapes").with_column(Column::new("Area", "geography"));
        let err = DdlGenerator::new()
            .render(&table, true, TypeMap::for_dialect(Dialect::SqlServer))
            .unwrap_err();
        match err {
            Error::UnsupportedType(e) => assert_eq!(e.type_name(), "geography"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_literals() {
        assert_eq!(default_to_sql(&DefaultValue::Bool(true), false), "1");
        assert_eq!(default_to_sql(&DefaultValue::Integer(-3), false), "-3");
        assert_eq!(default_to_sql(&DefaultValue::Float(1.5), false), "1.5");
        assert_eq!(
            default_to_sql(&DefaultValue::Text("it's".into()), true),
            "N'it''s'"
        );
    }

    #[test]
    fn test_decimal_precision_is_clamped() {
        assert_eq!(decimal("DECIMAL", 10, 38), "DECIMAL(10,2)");
        assert_eq!(decimal("DECIMAL", 100, 38), "DECIMAL(38,2)");
        assert_eq!(decimal("DECIMAL", 1, 65), "DECIMAL(2,2)");
    }

    #[test]
    fn test_modes_never_coincide() {
        fn property(names: Vec<String>, nullable: Vec<bool>, mysql: bool) -> TestResult {
            let names: Vec<String> = names
                .into_iter()
                .filter(|n| !n.trim().is_empty())
                .collect();
            if names.is_empty() {
                return TestResult::discard();
            }
            let mut table = Table::new("Sample");
            for (i, name) in names.iter().enumerate() {
                let mut column = Column::new(name.as_str(), "int");
                column.is_nullable = nullable.get(i).copied().unwrap_or(true);
                table.add_column(column);
            }
            let dialect = if mysql { Dialect::MySql } else { Dialect::SqlServer };
            let map = TypeMap::for_dialect(dialect);
            let generator = DdlGenerator::new();
            match (
                generator.render(&table, true, map),
                generator.render(&table, false, map),
            ) {
                (Ok(create), Ok(alter)) => TestResult::from_bool(create != alter),
                _ => TestResult::failed(),
            }
        }
        QuickCheck::new()
            .tests(200)
            .quickcheck(property as fn(Vec<String>, Vec<bool>, bool) -> TestResult);
    }
}
