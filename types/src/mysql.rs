//! MySQL / MariaDB mapping table

use crate::{
    Dialect, HostType,
    type_map::{LengthKind, TypeMap, TypeMapping},
};

use HostType as H;
use LengthKind as L;

const fn row(db: &'static str, host: HostType, size: i64, length: LengthKind) -> TypeMapping {
    TypeMapping::new(db, host, size, length)
}

const MAPPINGS: &[TypeMapping] = &[
    // Booleans
    row("tinyint(1)", H::Bool, 1, L::None),
    row("bit", H::Bool, 1, L::None),
    row("bool", H::Bool, 1, L::None),
    row("boolean", H::Bool, 1, L::None),
    // Integers
    row("tinyint", H::SByte, 1, L::None),
    row("tinyint unsigned", H::Byte, 1, L::None),
    row("smallint", H::Int16, 2, L::None),
    row("smallint unsigned", H::UInt16, 2, L::None),
    row("year", H::Int16, 1, L::None),
    row("int", H::Int32, 4, L::None),
    row("integer", H::Int32, 4, L::None),
    row("int unsigned", H::UInt32, 4, L::None),
    row("integer unsigned", H::UInt32, 4, L::None),
    row("mediumint", H::Int32, 3, L::None),
    row("mediumint unsigned", H::UInt32, 3, L::None),
    row("bigint", H::Int64, 8, L::None),
    row("bigint unsigned", H::UInt64, 8, L::None),
    // Fractional
    row("float", H::Single, 4, L::None),
    row("double", H::Double, 8, L::None),
    row("real", H::Double, 8, L::None),
    row("decimal", H::Decimal, 18, L::Precision),
    row("numeric", H::Decimal, 18, L::Precision),
    // Text
    row("char(1)", H::Char, 1, L::None),
    row("char(36)", H::Guid, 36, L::None),
    row("varchar", H::String, 64, L::Length),
    row("char", H::String, 1, L::Length),
    row("nvarchar", H::String, 64, L::Length),
    row("nchar", H::String, 1, L::Length),
    row("tinytext", H::String, 255, L::None),
    row("text", H::String, 65_535, L::None),
    row("mediumtext", H::String, 16_777_215, L::None),
    row("longtext", H::String, 4_294_967_295, L::None),
    row("json", H::String, 0, L::None),
    row("enum", H::String, 0, L::None),
    row("set", H::String, 0, L::None),
    // Binary
    row("blob", H::Bytes, 65_535, L::None),
    row("binary", H::Bytes, 1, L::Length),
    row("varbinary", H::Bytes, 64, L::Length),
    row("tinyblob", H::Bytes, 255, L::None),
    row("mediumblob", H::Bytes, 16_777_215, L::None),
    row("longblob", H::Bytes, 4_294_967_295, L::None),
    // Temporal
    row("datetime", H::DateTime, 8, L::None),
    row("date", H::DateTime, 3, L::None),
    row("timestamp", H::DateTime, 4, L::None),
    row("time", H::TimeSpan, 3, L::None),
];

const CANONICAL: &[(HostType, &str)] = &[
    (H::Byte, "tinyint unsigned"),
    (H::DateTimeOffset, "datetime"),
    (H::DateOnly, "date"),
    (H::TimeOnly, "time"),
    (H::Object, "json"),
];

pub(crate) static TYPE_MAP: TypeMap = TypeMap::new(Dialect::MySql, MAPPINGS, CANONICAL, 4_294_967_295);

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> &'static TypeMap {
        TypeMap::for_dialect(Dialect::MySql)
    }

    #[test]
    fn test_db_type_to_host_type() {
        let cases = [
            ("mediumText", true, "string"),
            ("nchar", true, "string"),
            ("char", true, "string"),
            ("text", true, "string"),
            ("int", true, "int?"),
            ("int", false, "int"),
            ("VARCHAR", false, "string"),
            ("tinyint(1)", false, "bool"),
            ("int(11) unsigned", true, "uint?"),
            ("char(36)", false, "Guid"),
            ("datetime", true, "DateTime?"),
        ];
        for (db, nullable, expected) in cases {
            assert_eq!(
                map().db_type_to_host_type(db, nullable).unwrap(),
                expected,
                "{db} nullable={nullable}"
            );
        }
    }

    #[test]
    fn test_host_to_db_type() {
        assert_eq!(map().host_to_db_type("string").unwrap(), "varchar");
        assert_eq!(map().host_to_db_type("bool").unwrap(), "tinyint(1)");
        assert_eq!(map().host_to_db_type("Guid").unwrap(), "char(36)");
        assert_eq!(map().host_to_db_type("long").unwrap(), "bigint");
        assert_eq!(map().host_to_db_type("byte[]").unwrap(), "blob");
        assert_eq!(map().host_to_db_type("DateTimeOffset").unwrap(), "datetime");
    }

    #[test]
    fn test_default_sizes() {
        assert_eq!(map().default_size_for("int"), 4);
        assert_eq!(map().default_size_for("varchar"), 64);
        assert_eq!(map().default_size_for("longtext"), 4_294_967_295);
        assert_eq!(map().default_size_for("decimal(10,4)"), 18);
    }
}
