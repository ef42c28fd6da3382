//! Extract command implementation
//!
//! Scans model source files into tables and writes a JSON schema snapshot.

use anyhow::Context;
use schemabridge_codegen::ModelIntrospector;
use schemabridge_schema::SchemaSnapshot;
use schemabridge_types::{Dialect, TypeMap};
use std::path::PathBuf;

use crate::commands::overrides;
use crate::config::{Config, Naming};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub files: Vec<PathBuf>,
    pub out: Option<PathBuf>,
    pub dialect: Option<Dialect>,
    pub naming: Option<Naming>,
}

/// Run the extract command
pub fn run(config: &Config, opts: ExtractOptions) -> anyhow::Result<()> {
    let dialect = overrides::resolve_dialect(config, opts.dialect, None);
    let naming = overrides::resolve_naming(config, opts.naming);

    eprintln!("{}", output::heading("Extracting tables from model source..."));
    eprintln!("  {}: {dialect}", output::label("Dialect"));
    eprintln!("  {}: {naming}", output::label("Naming"));

    let mut sources = Vec::with_capacity(opts.files.len());
    for path in &opts.files {
        let source = std::fs::read_to_string(path)
            .map_err(|e| CliError::IoError(e.to_string()))
            .with_context(|| format!("failed to read {}", path.display()))?;
        sources.push(source);
    }
    eprintln!(
        "  {} {} source file(s)",
        output::label("Scanning"),
        sources.len()
    );

    let tables = ModelIntrospector::new()
        .with_names(naming.converter())
        .extract(TypeMap::for_dialect(dialect), &sources)
        .map_err(CliError::from)?;

    if tables.is_empty() {
        let files: Vec<String> = opts.files.iter().map(|p| p.display().to_string()).collect();
        return Err(CliError::NoModels(files.join(", ")).into());
    }

    for table in &tables {
        eprintln!(
            "  {} {} {}",
            output::success("+"),
            table.qualified_name(),
            output::muted(&format!("({} columns)", table.columns.len()))
        );
    }

    let json = SchemaSnapshot::new(dialect, tables)
        .to_json()
        .map_err(CliError::from)?;
    super::emit(&json, opts.out.as_deref())?;

    if let Some(out) = &opts.out {
        eprintln!(
            "{}",
            output::success(&format!("Wrote {}", out.display()))
        );
    }
    Ok(())
}
