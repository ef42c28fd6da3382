//! Model command implementation
//!
//! Renders one model source file per table of a schema snapshot.

use anyhow::Context;
use schemabridge_codegen::ModelGenerator;
use schemabridge_types::{Dialect, TypeMap};
use std::path::PathBuf;

use crate::commands::overrides::{self, ModelOverrides};
use crate::config::{Config, Naming};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone)]
pub struct ModelOptions {
    pub schema: PathBuf,
    /// Directory for the `.cs` files; stdout when absent
    pub out: Option<PathBuf>,
    pub dialect: Option<Dialect>,
    pub naming: Option<Naming>,
    pub flags: ModelOverrides,
}

/// Run the model command
pub fn run(config: &Config, opts: ModelOptions) -> anyhow::Result<()> {
    let (tables, snapshot_dialect) = overrides::read_snapshot(&opts.schema)
        .with_context(|| format!("failed to load {}", opts.schema.display()))?;
    let dialect = overrides::resolve_dialect(config, opts.dialect, snapshot_dialect);
    let naming = overrides::resolve_naming(config, opts.naming);
    let options = opts.flags.apply(config.model.clone());
    let generator = ModelGenerator::with_names(naming.converter());
    let map = TypeMap::for_dialect(dialect);

    if tables.is_empty() {
        eprintln!("{}", output::warning("Snapshot contains no tables."));
        return Ok(());
    }

    let mut rendered = Vec::with_capacity(tables.len());
    for table in &tables {
        let code = generator
            .render(table, &options, map)
            .map_err(CliError::from)
            .with_context(|| format!("failed to render model for table {}", table.name))?;
        rendered.push((generator.render_file_name(table, &options), code));
    }

    match &opts.out {
        Some(dir) => {
            for (file_name, code) in &rendered {
                let path = dir.join(file_name);
                super::emit(code, Some(&path))?;
                eprintln!("  {} {}", output::success("+"), path.display());
            }
            eprintln!(
                "{}",
                output::success(&format!("Wrote {} model file(s)", rendered.len()))
            );
        }
        None => {
            let all: Vec<&str> = rendered.iter().map(|(_, code)| code.as_str()).collect();
            super::emit(&all.join("\n\n"), None)?;
        }
    }
    Ok(())
}
