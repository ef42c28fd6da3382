//! MySQL DDL

use super::{ColumnDef, TableDdl, decimal, default_to_sql};
use schemabridge_schema::DefaultValue;
use schemabridge_types::{Dialect, LengthKind};

const MAX_PRECISION: i64 = 65;
/// Largest `VARCHAR(n)` a row can hold
const MAX_LENGTH: i64 = 65_535;

fn quote(ident: &str) -> String {
    Dialect::MySql.quote_ident(ident)
}

fn table_name(ddl: &TableDdl<'_>) -> String {
    match ddl.table.schema.as_deref().filter(|s| !s.is_empty()) {
        Some(schema) => format!("{}.{}", quote(schema), quote(&ddl.table.name)),
        None => quote(&ddl.table.name),
    }
}

/// `'...'` with quotes doubled and backslashes escaped
fn comment(text: &str) -> String {
    super::quote_string(&text.replace('\\', "\\\\"))
}

pub(super) fn create_table(ddl: &TableDdl<'_>) -> Vec<String> {
    let mut parts: Vec<String> = ddl
        .columns
        .iter()
        .map(|column| format!("\t{}", column_to_sql(ddl, column)))
        .collect();
    if let Some(keys) = primary_key_columns(ddl) {
        parts.push(format!("\tPRIMARY KEY ({keys})"));
    }

    let mut sql = format!("CREATE TABLE {}(\n", table_name(ddl));
    sql.push_str(&parts.join(",\n"));
    sql.push_str("\n)");
    if let Some(description) = ddl.description() {
        sql.push_str(&format!(" COMMENT={}", comment(description)));
    }
    sql.push(';');
    vec![sql]
}

/// `ADD COLUMN` per column, then the key and the table comment
pub(super) fn alter_table(ddl: &TableDdl<'_>) -> Vec<String> {
    let table = table_name(ddl);
    let mut statements: Vec<String> = ddl
        .columns
        .iter()
        .map(|column| {
            format!(
                "ALTER TABLE {table} ADD COLUMN {};",
                column_to_sql(ddl, column)
            )
        })
        .collect();
    if let Some(keys) = primary_key_columns(ddl) {
        statements.push(format!("ALTER TABLE {table} ADD PRIMARY KEY ({keys});"));
    }
    if let Some(description) = ddl.description() {
        statements.push(format!(
            "ALTER TABLE {table} COMMENT={};",
            comment(description)
        ));
    }
    statements
}

fn primary_key_columns(ddl: &TableDdl<'_>) -> Option<String> {
    let keys = ddl
        .primary_keys()
        .map(|c| quote(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    (!keys.is_empty()).then_some(keys)
}

/// Convert a column to its SQL definition
fn column_to_sql(ddl: &TableDdl<'_>, def: &ColumnDef<'_>) -> String {
    let mut parts = vec![quote(&def.column.name), column_type(def)];

    parts.push(if def.nullable() { "NULL" } else { "NOT NULL" }.to_string());

    if let Some(ref default) = def.column.default_value {
        let literal = match default {
            DefaultValue::Text(s) => comment(s),
            other => default_to_sql(other, false),
        };
        parts.push(format!("DEFAULT {literal}"));
    }

    if let Some(description) = ddl.column_description(def.column) {
        parts.push(format!("COMMENT {}", comment(description)));
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
                format!("{name}({})", def.mapping.default_size)
            } else {
                format!("{name}({size})")
            }
        }
    }
}
