//! Configuration for the schemabridge CLI
//!
//! Handles loading `schemabridge.toml`. Every key is optional; a missing
//! default file means default settings.

use schemabridge_codegen::{DdlOptions, GenerateOptions};
use schemabridge_schema::{DefaultNameConverter, NameConverter, PluralNameConverter};
use schemabridge_types::Dialect;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "schemabridge.toml";

// ============================================================================
// Naming
// ============================================================================

/// Model <-> table naming policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Naming {
    /// Model names are table names; legacy `tab`/`tbl` prefixes are dropped for models
    #[default]
    Default,
    /// `BlogPost` <-> `blog_posts`
    Plural,
}

impl Naming {
    pub const ALL: &'static [&'static str] = &["default", "plural"];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Plural => "plural",
        }
    }

    pub fn converter(self) -> Box<dyn NameConverter> {
        match self {
            Self::Default => Box::new(DefaultNameConverter),
            Self::Plural => Box::new(PluralNameConverter),
        }
    }
}

impl std::fmt::Display for Naming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Naming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "plural" => Ok(Self::Plural),
            other => Err(format!(
                "unknown naming '{other}' (expected one of: {})",
                Self::ALL.join(", ")
            )),
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// `[ddl]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DdlSection {
    pub include_descriptions: bool,
}

impl Default for DdlSection {
    fn default() -> Self {
        Self {
            include_descriptions: DdlOptions::default().include_descriptions,
        }
    }
}

/// Parsed `schemabridge.toml`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dialect: Dialect,
    pub naming: Naming,
    pub model: GenerateOptions,
    pub ddl: DdlSection,
}

impl Config {
    /// Load `schemabridge.toml` from the current directory
    pub fn load() -> Result<Self, Error> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Read(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content).map_err(|e| match e {
            Error::Parse(_, msg) => Error::Parse(path.to_path_buf(), msg),
            other => other,
        })
    }

    /// Load an explicit path, or the default file when it exists, or defaults
    pub fn resolve(custom_path: Option<&Path>) -> Result<Self, Error> {
        match custom_path {
            Some(path) => Self::load_from(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        toml::from_str(content)
            .map_err(|e| Error::Parse(PathBuf::from(CONFIG_FILE), e.to_string()))
    }

    /// Content written by `schemabridge init`
    pub fn template(dialect: Dialect) -> String {
        let defaults = GenerateOptions::default();
        format!(
            r#"# schemabridge configuration

# Dialect whose type names the schema uses: "mysql" or "sqlserver"
dialect = "{dialect}"

# Model <-> table naming: "default" or "plural"
naming = "default"

[model]
namespace = "{namespace}"
type_prefix = ""
type_suffix = ""
indent_unit = "{indent}"
emit_annotations = false
emit_encapsulated_fields = false
nullable_types_enabled = false
file_scoped_namespace = false
implicit_imports_enabled = false

[ddl]
include_descriptions = true
"#,
            namespace = defaults.namespace,
            indent = defaults.indent_unit,
        )
    }

    pub fn ddl_options(&self, full_create: bool) -> DdlOptions {
        DdlOptions {
            full_create,
            include_descriptions: self.ddl.include_descriptions,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Read(PathBuf, String),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, String),
}

pub type ConfigError = Error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.dialect, Dialect::SqlServer);
        assert_eq!(config.naming, Naming::Default);
        assert_eq!(config.model, GenerateOptions::default());
        assert!(config.ddl.include_descriptions);
    }

    #[test]
    fn sections() {
        let config = Config::parse(
            r#"
dialect = "mariadb"
naming = "plural"

[model]
namespace = "Shop.Models"
emit_annotations = true

[ddl]
include_descriptions = false
"#,
        )
        .unwrap();
        assert_eq!(config.dialect, Dialect::MySql);
        assert_eq!(config.naming, Naming::Plural);
        assert_eq!(config.model.namespace, "Shop.Models");
        assert!(config.model.emit_annotations);
        assert_eq!(config.model.indent_unit, "  ");
        assert!(!config.ddl_options(true).include_descriptions);
    }

    #[test]
    fn template_round_trips() {
        for dialect in Dialect::ALL {
            let config = Config::parse(&Config::template(*dialect)).unwrap();
            assert_eq!(config.dialect, *dialect);
            assert_eq!(config.model, GenerateOptions::default());
        }
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            Config::parse("dialect = \"oracle\""),
            Err(Error::Parse(..))
        ));
        assert!(matches!(
            Config::parse("naming = 3"),
            Err(Error::Parse(..))
        ));
    }

    #[test]
    fn naming_from_str() {
        assert_eq!("Plural".parse::<Naming>().unwrap(), Naming::Plural);
        assert!("camel".parse::<Naming>().is_err());
        assert_eq!(
            Naming::Plural.converter().model_to_table("BlogPost"),
            "blog_posts"
        );
    }

    #[test]
    fn missing_explicit_file() {
        let err = Config::load_from(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
