//! CLI command implementations
//!
//! Each command module implements a specific schemabridge CLI command.

pub mod ddl;
pub mod extract;
pub mod init;
pub mod model;
pub mod overrides;

use anyhow::Context;
use std::path::Path;

/// Write `content` to `path`, or to stdout without one
fn emit(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
