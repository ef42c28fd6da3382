//! SQL Server DDL

use super::{ColumnDef, TableDdl, decimal, default_to_sql};
use schemabridge_types::{Dialect, LengthKind};

/// Schema used for extended properties when the table names none
const DEFAULT_SCHEMA: &str = "dbo";
/// Largest `NVARCHAR(n)` before `MAX` is required
const MAX_LENGTH: i64 = 4000;
const MAX_PRECISION: i64 = 38;

fn quote(ident: &str) -> String {
    Dialect::SqlServer.quote_ident(ident)
}

fn table_name(ddl: &TableDdl<'_>) -> String {
    match ddl.table.schema.as_deref().filter(|s| !s.is_empty()) {
        Some(schema) => format!("{}.{}", quote(schema), quote(&ddl.table.name)),
        None => quote(&ddl.table.name),
    }
}

/// `CREATE TABLE` followed by description properties
pub(super) fn create_table(ddl: &TableDdl<'_>) -> Vec<String> {
    let mut parts: Vec<String> = ddl
        .columns
        .iter()
        .map(|column| format!("\t{}", column_to_sql(column)))
        .collect();
    if let Some(pk) = primary_key(ddl) {
        parts.push(format!("\t{pk}"));
    }

    let mut sql = format!("CREATE TABLE {}(\n", table_name(ddl));
    sql.push_str(&parts.join(",\n"));
    sql.push_str("\n);");

    let mut statements = vec![sql];
    if let Some(description) = ddl.description() {
        statements.push(describe(ddl, description, None));
    }
    statements.extend(column_descriptions(ddl));
    statements
}

/// One `ALTER TABLE ... ADD` per column, then the key and descriptions
pub(super) fn alter_table(ddl: &TableDdl<'_>) -> Vec<String> {
    let table = table_name(ddl);
    let mut statements: Vec<String> = ddl
        .columns
        .iter()
        .map(|column| format!("ALTER TABLE {table} ADD {};", column_to_sql(column)))
        .collect();
    if let Some(pk) = primary_key(ddl) {
        statements.push(format!("ALTER TABLE {table} ADD {pk};"));
    }
    statements.extend(column_descriptions(ddl));
    statements
}

fn primary_key(ddl: &TableDdl<'_>) -> Option<String> {
    let keys = ddl
        .primary_keys()
        .map(|c| quote(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    if keys.is_empty() {
        return None;
    }
    Some(format!(
        "CONSTRAINT {} PRIMARY KEY ({keys})",
        quote(&format!("PK_{}", ddl.table.name))
    ))
}

fn column_descriptions(ddl: &TableDdl<'_>) -> Vec<String> {
    ddl.columns
        .iter()
        .filter_map(|c| {
            ddl.column_description(c.column)
                .map(|d| describe(ddl, d, Some(&c.column.name)))
        })
        .collect()
}

/// `sp_addextendedproperty` for the table, or for one of its columns
fn describe(ddl: &TableDdl<'_>, description: &str, column: Option<&str>) -> String {
    let schema = ddl
        .table
        .schema
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SCHEMA);
    let mut sql = format!(
        "EXEC sp_addextendedproperty N'MS_Description', {}, N'SCHEMA', {}, N'TABLE', {}",
        national(description),
        national(schema),
        national(&ddl.table.name)
    );
    if let Some(column) = column {
        sql.push_str(&format!(", N'COLUMN', {}", national(column)));
    }
    sql.push(';');
    sql
}

fn national(s: &str) -> String {
    format!("N{}", super::quote_string(s))
}

/// Convert a column to its SQL definition
fn column_to_sql(def: &ColumnDef<'_>) -> String {
    let mut parts = vec![quote(&def.column.name), column_type(def)];

    parts.push(if def.nullable() { "NULL" } else { "NOT NULL" }.to_string());

    if let Some(ref default) = def.column.default_value {
        parts.push(format!("DEFAULT {}", default_to_sql(default, true)));
    }

    parts.join(" ")
}

fn column_type(def: &ColumnDef<'_>) -> String {
    let name = def.declared_type();
    match def.length() {
        LengthKind::None => name,
        LengthKind::Precision => decimal(&name, def.size(), MAX_PRECISION),
        LengthKind::Length => {
            let size = def.size();
            if size <= 0 || size > MAX_LENGTH {
                format!("{name}(MAX)")
            } else {
                format!("{name}({size})")
            }
        }
    }
}
