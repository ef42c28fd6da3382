//! DDL command implementation
//!
//! Renders `CREATE TABLE` (or `ALTER TABLE ... ADD`) statements for a schema snapshot.

use anyhow::Context;
use schemabridge_codegen::DdlGenerator;
use schemabridge_types::{Dialect, TypeMap};
use std::path::PathBuf;

use crate::commands::overrides;
use crate::config::Config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone)]
pub struct DdlCommandOptions {
    pub schema: PathBuf,
    pub out: Option<PathBuf>,
    pub dialect: Option<Dialect>,
    /// Emit `ALTER TABLE ... ADD` statements instead of `CREATE TABLE`
    pub alter: bool,
    pub no_descriptions: bool,
}

/// Run the ddl command
pub fn run(config: &Config, opts: DdlCommandOptions) -> anyhow::Result<()> {
    let (tables, snapshot_dialect) = overrides::read_snapshot(&opts.schema)
        .with_context(|| format!("failed to load {}", opts.schema.display()))?;
    let dialect = overrides::resolve_dialect(config, opts.dialect, snapshot_dialect);
    let mut options = config.ddl_options(!opts.alter);
    if opts.no_descriptions {
        options.include_descriptions = false;
    }

    if tables.is_empty() {
        eprintln!("{}", output::warning("Snapshot contains no tables."));
        return Ok(());
    }

    let generator = DdlGenerator::new();
    let map = TypeMap::for_dialect(dialect);
    let mut statements = Vec::with_capacity(tables.len());
    for table in &tables {
        let sql = generator
            .render_with(table, &options, map)
            .map_err(CliError::from)
            .with_context(|| format!("failed to render DDL for table {}", table.name))?;
        statements.push(sql);
    }

    super::emit(&statements.join("\n\n"), opts.out.as_deref())?;
    if let Some(out) = &opts.out {
        eprintln!(
            "{}",
            output::success(&format!(
                "Wrote {} statement block(s) to {}",
                statements.len(),
                out.display()
            ))
        );
    }
    Ok(())
}
