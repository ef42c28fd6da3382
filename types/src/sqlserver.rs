//! Microsoft SQL Server mapping table

use crate::{
    Dialect, HostType,
    type_map::{LengthKind, TypeMap, TypeMapping},
};

use HostType as H;
use LengthKind as L;

const fn row(db: &'static str, host: HostType, size: i64, length: LengthKind) -> TypeMapping {
    TypeMapping::new(db, host, size, length)
}

/// `MAX` length
const UNBOUNDED: i64 = -1;

const MAPPINGS: &[TypeMapping] = &[
    row("bit", H::Bool, 1, L::None),
    row("tinyint", H::Byte, 1, L::None),
    row("smallint", H::Int16, 2, L::None),
    row("int", H::Int32, 4, L::None),
    row("bigint", H::Int64, 8, L::None),
    row("real", H::Single, 4, L::None),
    row("float", H::Double, 8, L::None),
    row("decimal", H::Decimal, 18, L::Precision),
    row("numeric", H::Decimal, 18, L::Precision),
    row("money", H::Decimal, 8, L::None),
    row("smallmoney", H::Decimal, 4, L::None),
    row("nchar(1)", H::Char, 1, L::None),
    row("nvarchar", H::String, 64, L::Length),
    row("varchar", H::String, 64, L::Length),
    row("nchar", H::String, 64, L::Length),
    row("char", H::String, 64, L::Length),
    row("ntext", H::String, UNBOUNDED, L::None),
    row("text", H::String, UNBOUNDED, L::None),
    row("xml", H::String, UNBOUNDED, L::None),
    row("datetime", H::DateTime, 8, L::None),
    row("datetime2", H::DateTime, 8, L::None),
    row("smalldatetime", H::DateTime, 4, L::None),
    row("date", H::DateTime, 3, L::None),
    row("datetimeoffset", H::DateTimeOffset, 10, L::None),
    row("time", H::TimeSpan, 5, L::None),
    row("uniqueidentifier", H::Guid, 16, L::None),
    row("varbinary", H::Bytes, UNBOUNDED, L::Length),
    row("binary", H::Bytes, 64, L::Length),
    row("image", H::Bytes, UNBOUNDED, L::None),
    row("timestamp", H::Bytes, 8, L::None),
    row("rowversion", H::Bytes, 8, L::None),
    row("sql_variant", H::Object, 0, L::None),
];

const CANONICAL: &[(HostType, &str)] = &[
    (H::SByte, "smallint"),
    (H::UInt16, "int"),
    (H::UInt32, "bigint"),
    (H::UInt64, "decimal"),
    (H::DateOnly, "date"),
    (H::TimeOnly, "time"),
];

pub(crate) static TYPE_MAP: TypeMap =
    TypeMap::new(Dialect::SqlServer, MAPPINGS, CANONICAL, UNBOUNDED);
