//! Bidirectional database type <-> host type tables
//!
//! Every dialect owns one immutable, `'static` [`TypeMap`]. The db -> host
//! direction is many-to-one; the host -> db direction is fixed by a per-dialect
//! canonical choice so that every host type lands on exactly one db type.

use crate::{Dialect, HostType, HostTypeRef, UnsupportedTypeError, mysql, sqlserver};

/// How a db type takes a size argument in DDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LengthKind {
    /// No size argument (`INT`, `TEXT`, `DATETIME`)
    None,
    /// A length, or the dialect's unbounded form (`VARCHAR(50)`, `NVARCHAR(MAX)`)
    Length,
    /// Precision with a fixed scale (`DECIMAL(18,2)`)
    Precision,
}

/// One row of a dialect mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    /// Lower-case db type name, optionally with a fixed argument (`tinyint(1)`)
    pub db_type: &'static str,
    pub host_type: HostType,
    pub default_size: i64,
    pub length: LengthKind,
}

impl TypeMapping {
    pub(crate) const fn new(
        db_type: &'static str,
        host_type: HostType,
        default_size: i64,
        length: LengthKind,
    ) -> Self {
        Self {
            db_type,
            host_type,
            default_size,
            length,
        }
    }
}

/// The mapping table of one dialect
///
/// # Examples
///
/// ```
/// use schemabridge_types::{Dialect, TypeMap};
///
/// let map = TypeMap::for_dialect(Dialect::MySql);
/// assert_eq!(map.db_type_to_host_type("int", true).unwrap(), "int?");
/// assert_eq!(map.db_type_to_host_type("MediumText", true).unwrap(), "string");
/// assert_eq!(map.host_to_db_type("string").unwrap(), "varchar");
/// ```
#[derive(Debug)]
pub struct TypeMap {
    dialect: Dialect,
    mappings: &'static [TypeMapping],
    /// Host -> db choices that differ from the first table row for that host type
    canonical: &'static [(HostType, &'static str)],
    /// Size reported for unbounded lengths
    unbounded_size: i64,
}

impl TypeMap {
    pub(crate) const fn new(
        dialect: Dialect,
        mappings: &'static [TypeMapping],
        canonical: &'static [(HostType, &'static str)],
        unbounded_size: i64,
    ) -> Self {
        Self {
            dialect,
            mappings,
            canonical,
            unbounded_size,
        }
    }

    /// The table for a dialect
    #[must_use]
    pub fn for_dialect(dialect: Dialect) -> &'static TypeMap {
        match dialect {
            Dialect::MySql => &mysql::TYPE_MAP,
            Dialect::SqlServer => &sqlserver::TYPE_MAP,
        }
    }

    /// The table for a dialect selected by string key
    pub fn from_key(key: &str) -> Result<&'static TypeMap, crate::DialectParseError> {
        key.parse::<Dialect>().map(Self::for_dialect)
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub const fn mappings(&self) -> &'static [TypeMapping] {
        self.mappings
    }

    /// Size value this dialect uses for "no upper bound"
    #[must_use]
    pub const fn unbounded_size(&self) -> i64 {
        self.unbounded_size
    }

    /// Find the row for a db type name.
    ///
    /// The name is matched case-insensitively after collapsing whitespace. An
    /// exact row (`tinyint(1)`) wins; otherwise parenthesized arguments are
    /// dropped and the lookup is retried (`int(10) unsigned` -> `int unsigned`).
    #[must_use]
    pub fn mapping(&self, db_type: &str) -> Option<&'static TypeMapping> {
        let normalized = normalize(db_type);
        if normalized.is_empty() {
            return None;
        }
        self.find(&normalized).or_else(|| {
            let bare = strip_arguments(&normalized);
            if bare == normalized {
                None
            } else {
                self.find(&bare)
            }
        })
    }

    fn find(&self, normalized: &str) -> Option<&'static TypeMapping> {
        self.mappings.iter().find(|m| m.db_type == normalized)
    }

    /// Map a db type to the host type spelling used in generated source.
    ///
    /// A nullable value type gets the `?` wrapper; reference types are
    /// returned unchanged since they already admit null.
    pub fn db_type_to_host_type(
        &self,
        db_type: &str,
        nullable: bool,
    ) -> Result<String, UnsupportedTypeError> {
        let mapping = self
            .mapping(db_type)
            .ok_or_else(|| UnsupportedTypeError::DbType {
                dialect: self.dialect,
                db_type: db_type.to_string(),
            })?;

        let host = mapping.host_type;
        if nullable && host.is_value_type() {
            Ok(format!("{}?", host.keyword()))
        } else {
            Ok(host.keyword().to_string())
        }
    }

    /// Map a host type to this dialect's canonical db type name.
    ///
    /// Enumerations resolve to their underlying integral type first.
    pub fn host_to_db_type<'a>(
        &self,
        host: impl Into<HostTypeRef<'a>>,
    ) -> Result<&'static str, UnsupportedTypeError> {
        let host_type = match host.into() {
            HostTypeRef::Known(ty) => ty,
            HostTypeRef::Named(name) => {
                HostType::from_type_name(name).ok_or_else(|| UnsupportedTypeError::HostType {
                    dialect: self.dialect,
                    host_type: name.to_string(),
                })?
            }
            HostTypeRef::Enum { underlying } => {
                let underlying = underlying.unwrap_or("int");
                match HostType::from_type_name(underlying) {
                    Some(ty) if ty.is_integral() => ty,
                    _ => {
                        return Err(UnsupportedTypeError::EnumUnderlying {
                            underlying: underlying.to_string(),
                        });
                    }
                }
            }
        };

        self.canonical
            .iter()
            .find(|(ty, _)| *ty == host_type)
            .map(|(_, db)| *db)
            .or_else(|| {
                self.mappings
                    .iter()
                    .find(|m| m.host_type == host_type)
                    .map(|m| m.db_type)
            })
            .ok_or_else(|| UnsupportedTypeError::HostType {
                dialect: self.dialect,
                host_type: host_type.keyword().to_string(),
            })
    }

    /// Default storage size for a db type; 0 when the type is not in the table
    #[must_use]
    pub fn default_size_for(&self, db_type: &str) -> i64 {
        self.mapping(db_type).map_or(0, |m| m.default_size)
    }
}

fn normalize(db_type: &str) -> String {
    db_type
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

fn strip_arguments(normalized: &str) -> String {
    let mut out = String::with_capacity(normalized.len());
    let mut depth = 0usize;
    for c in normalized.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    normalize(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_stripping() {
        assert_eq!(strip_arguments("int(10) unsigned"), "int unsigned");
        assert_eq!(strip_arguments("nvarchar(max)"), "nvarchar");
        assert_eq!(strip_arguments("decimal(18, 2)"), "decimal");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  BIGINT   Unsigned "), "bigint unsigned");
    }

    #[test]
    fn test_every_host_type_round_trips_nullability() {
        for dialect in Dialect::ALL {
            let map = TypeMap::for_dialect(*dialect);
            for host in HostType::ALL {
                let db = map
                    .host_to_db_type(*host)
                    .unwrap_or_else(|e| panic!("{dialect}: {e}"));

                let not_null = map.db_type_to_host_type(db, false).unwrap();
                let nullable = map.db_type_to_host_type(db, true).unwrap();
                let back = HostType::from_type_name(&not_null).unwrap();

                assert_eq!(
                    back.is_value_type(),
                    host.is_value_type(),
                    "{dialect}: {host} -> {db} -> {not_null}"
                );
                assert!(!not_null.ends_with('?'));
                if host.is_value_type() {
                    assert_eq!(nullable, format!("{not_null}?"));
                } else {
                    assert_eq!(nullable, not_null);
                }
            }
        }
    }

    #[test]
    fn test_core_types_round_trip_exactly() {
        let core = [
            HostType::Bool,
            HostType::Byte,
            HostType::Int16,
            HostType::Int32,
            HostType::Int64,
            HostType::Single,
            HostType::Double,
            HostType::Decimal,
            HostType::Char,
            HostType::String,
            HostType::DateTime,
            HostType::TimeSpan,
            HostType::Guid,
            HostType::Bytes,
        ];
        for dialect in Dialect::ALL {
            let map = TypeMap::for_dialect(*dialect);
            for host in core {
                let db = map.host_to_db_type(host).unwrap();
                assert_eq!(
                    map.db_type_to_host_type(db, false).unwrap(),
                    host.keyword(),
                    "{dialect}: {host} -> {db}"
                );
            }
        }
    }

    #[test]
    fn test_enum_resolves_underlying() {
        let map = TypeMap::for_dialect(Dialect::SqlServer);
        assert_eq!(
            map.host_to_db_type(HostTypeRef::Enum { underlying: None }).unwrap(),
            "int"
        );
        assert_eq!(
            map.host_to_db_type(HostTypeRef::Enum {
                underlying: Some("byte")
            })
            .unwrap(),
            "tinyint"
        );
        assert!(matches!(
            map.host_to_db_type(HostTypeRef::Enum {
                underlying: Some("string")
            }),
            Err(UnsupportedTypeError::EnumUnderlying { .. })
        ));
    }

    #[test]
    fn test_unknown_types() {
        let map = TypeMap::for_dialect(Dialect::MySql);
        let err = map.db_type_to_host_type("geometry", false).unwrap_err();
        assert_eq!(err.type_name(), "geometry");
        assert!(map.host_to_db_type("Post").is_err());
        assert_eq!(map.default_size_for("geometry"), 0);
        assert!(map.mapping("").is_none());
    }

    #[test]
    fn test_from_key() {
        assert_eq!(TypeMap::from_key("mssql").unwrap().dialect(), Dialect::SqlServer);
        assert!(TypeMap::from_key("oracle").is_err());
    }
}
