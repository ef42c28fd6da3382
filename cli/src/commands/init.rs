//! Init command implementation
//!
//! Writes a default `schemabridge.toml`.

use schemabridge_types::Dialect;
use std::path::Path;

use crate::config::{CONFIG_FILE, Config};
use crate::error::CliError;
use crate::output;

/// Create `schemabridge.toml` in `dir`; an existing file is never overwritten
pub fn run(dir: &Path, dialect: Dialect) -> Result<(), CliError> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() {
        return Err(CliError::Other(format!(
            "{CONFIG_FILE} already exists. Delete it first to reinitialize."
        )));
    }

    std::fs::write(&config_path, Config::template(dialect))
        .map_err(|e| CliError::IoError(format!("{}: {e}", config_path.display())))?;
    tracing::debug!(path = %config_path.display(), %dialect, "wrote config");

    println!("{}", output::success(&format!("Created {CONFIG_FILE}")));
    println!();
    println!("Next steps:");
    println!(
        "  1. Extract tables from your models: {}",
        output::heading("schemabridge extract Models/*.cs --out schema.json")
    );
    println!(
        "  2. Render DDL from the snapshot: {}",
        output::heading("schemabridge ddl --schema schema.json")
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_template_once() {
        let temp = tempfile::TempDir::new().unwrap();
        run(temp.path(), Dialect::MySql).unwrap();

        let content = std::fs::read_to_string(temp.path().join(CONFIG_FILE)).unwrap();
        assert!(content.contains("dialect = \"mysql\""));

        let err = run(temp.path(), Dialect::SqlServer).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        let unchanged = std::fs::read_to_string(temp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(unchanged, content);
    }
}
