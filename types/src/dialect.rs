//! Database dialect identification
//!
//! A dialect is selected by a string key (from configuration or the command line)
//! and owns exactly one [`TypeMap`](crate::TypeMap).

/// SQL dialect whose type system the mapping tables describe
///
/// # Examples
///
/// ```
/// use schemabridge_types::Dialect;
///
/// assert_eq!(Dialect::parse("mssql"), Some(Dialect::SqlServer));
/// assert_eq!(Dialect::parse("MariaDB"), Some(Dialect::MySql));
/// assert_eq!(Dialect::parse("oracle"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// MySQL and MariaDB
    #[cfg_attr(feature = "serde", serde(alias = "mariadb"))]
    MySql,

    /// Microsoft SQL Server
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "mssql"))]
    SqlServer,
}

impl Dialect {
    pub const ALL: &'static [Dialect] = &[Dialect::MySql, Dialect::SqlServer];

    /// Parse a dialect from a string key (case-insensitive)
    ///
    /// Supported aliases:
    /// - MySQL: `"mysql"`, `"mariadb"`
    /// - SQL Server: `"sqlserver"`, `"mssql"`, `"sql-server"`
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("mysql") || s.eq_ignore_ascii_case("mariadb") {
            Some(Dialect::MySql)
        } else if s.eq_ignore_ascii_case("sqlserver")
            || s.eq_ignore_ascii_case("mssql")
            || s.eq_ignore_ascii_case("sql-server")
        {
            Some(Dialect::SqlServer)
        } else {
            None
        }
    }

    /// Get the canonical dialect key
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::SqlServer => "sqlserver",
        }
    }

    /// Quote an identifier the way this dialect expects
    #[must_use]
    pub fn quote_ident(&self, ident: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
            Dialect::SqlServer => format!("[{}]", ident.replace(']', "]]")),
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::parse(s).ok_or_else(|| DialectParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown dialect key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}` (expected one of: mysql, sqlserver)")]
pub struct DialectParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parse() {
        assert_eq!(Dialect::parse("mysql"), Some(Dialect::MySql));
        assert_eq!(Dialect::parse("MySQL"), Some(Dialect::MySql));
        assert_eq!(Dialect::parse("mariadb"), Some(Dialect::MySql));

        assert_eq!(Dialect::parse("sqlserver"), Some(Dialect::SqlServer));
        assert_eq!(Dialect::parse("SqlServer"), Some(Dialect::SqlServer));
        assert_eq!(Dialect::parse("mssql"), Some(Dialect::SqlServer));
        assert_eq!(Dialect::parse(" sql-server "), Some(Dialect::SqlServer));

        assert_eq!(Dialect::parse("postgres"), None);
        assert_eq!(Dialect::parse(""), None);
    }

    #[test]
    fn test_dialect_from_str_error() {
        let err = "sqlite".parse::<Dialect>().unwrap_err();
        assert_eq!(err, DialectParseError("sqlite".to_string()));
        assert!(err.to_string().contains("sqlite"));
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(format!("{}", Dialect::MySql), "mysql");
        assert_eq!(format!("{}", Dialect::SqlServer), "sqlserver");
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(Dialect::MySql.quote_ident("user"), "`user`");
        assert_eq!(Dialect::SqlServer.quote_ident("user"), "[user]");
        assert_eq!(Dialect::SqlServer.quote_ident("a]b"), "[a]]b]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_dialect_serde_aliases() {
        let d: Dialect = serde_json::from_str("\"mssql\"").unwrap();
        assert_eq!(d, Dialect::SqlServer);
        let d: Dialect = serde_json::from_str("\"mariadb\"").unwrap();
        assert_eq!(d, Dialect::MySql);
        assert_eq!(serde_json::to_string(&Dialect::MySql).unwrap(), "\"mysql\"");
    }
}
