//! Host-language (C#) scalar type vocabulary
//!
//! Provides the single source of truth for recognizing a declared C# type name
//! as one of the scalar types the mapping tables know about.

/// Scalar types of the host language that can be stored in a column.
///
/// # Examples
///
/// ```
/// use schemabridge_types::HostType;
///
/// assert_eq!(HostType::from_type_name("System.Int32"), Some(HostType::Int32));
/// assert_eq!(HostType::from_type_name("string?"), Some(HostType::String));
/// assert_eq!(HostType::from_type_name("List<Post>"), None);
/// assert_eq!(HostType::Int64.keyword(), "long");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostType {
    Bool,
    Byte,
    SByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    Char,
    String,
    DateTime,
    DateTimeOffset,
    DateOnly,
    TimeOnly,
    TimeSpan,
    Guid,
    /// `byte[]`
    Bytes,
    Object,
}

impl HostType {
    pub const ALL: &'static [HostType] = &[
        HostType::Bool,
        HostType::Byte,
        HostType::SByte,
        HostType::Int16,
        HostType::UInt16,
        HostType::Int32,
        HostType::UInt32,
        HostType::Int64,
        HostType::UInt64,
        HostType::Single,
        HostType::Double,
        HostType::Decimal,
        HostType::Char,
        HostType::String,
        HostType::DateTime,
        HostType::DateTimeOffset,
        HostType::DateOnly,
        HostType::TimeOnly,
        HostType::TimeSpan,
        HostType::Guid,
        HostType::Bytes,
        HostType::Object,
    ];

    /// Detect the host type from a declared type name.
    ///
    /// Accepts language keywords (`int`), framework names (`Int32`) and
    /// namespace-qualified names (`System.Int32`, `global::System.Int32`).
    /// A trailing nullable marker (`int?`) is ignored; callers track
    /// nullability separately.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        let name = name.strip_suffix('?').unwrap_or(&name);
        let name = name.strip_prefix("global::").unwrap_or(name);
        let name = name.strip_prefix("System.").unwrap_or(name);

        if let Some(inner) = name
            .strip_prefix("Nullable<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return Self::from_type_name(inner);
        }

        let ty = match name {
            "bool" | "Boolean" => HostType::Bool,
            "byte" | "Byte" => HostType::Byte,
            "sbyte" | "SByte" => HostType::SByte,
            "short" | "Int16" => HostType::Int16,
            "ushort" | "UInt16" => HostType::UInt16,
            "int" | "Int32" => HostType::Int32,
            "uint" | "UInt32" => HostType::UInt32,
            "long" | "Int64" => HostType::Int64,
            "ulong" | "UInt64" => HostType::UInt64,
            "float" | "Single" => HostType::Single,
            "double" | "Double" => HostType::Double,
            "decimal" | "Decimal" => HostType::Decimal,
            "char" | "Char" => HostType::Char,
            "string" | "String" => HostType::String,
            "DateTime" => HostType::DateTime,
            "DateTimeOffset" => HostType::DateTimeOffset,
            "DateOnly" => HostType::DateOnly,
            "TimeOnly" => HostType::TimeOnly,
            "TimeSpan" => HostType::TimeSpan,
            "Guid" => HostType::Guid,
            "byte[]" | "Byte[]" => HostType::Bytes,
            "object" | "Object" => HostType::Object,
            _ => return None,
        };
        Some(ty)
    }

    /// The spelling used in generated source
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            HostType::Bool => "bool",
            HostType::Byte => "byte",
            HostType::SByte => "sbyte",
            HostType::Int16 => "short",
            HostType::UInt16 => "ushort",
            HostType::Int32 => "int",
            HostType::UInt32 => "uint",
            HostType::Int64 => "long",
            HostType::UInt64 => "ulong",
            HostType::Single => "float",
            HostType::Double => "double",
            HostType::Decimal => "decimal",
            HostType::Char => "char",
            HostType::String => "string",
            HostType::DateTime => "DateTime",
            HostType::DateTimeOffset => "DateTimeOffset",
            HostType::DateOnly => "DateOnly",
            HostType::TimeOnly => "TimeOnly",
            HostType::TimeSpan => "TimeSpan",
            HostType::Guid => "Guid",
            HostType::Bytes => "byte[]",
            HostType::Object => "object",
        }
    }

    /// Value types have a non-null zero value and need the `?` wrapper to hold null.
    #[must_use]
    pub const fn is_value_type(&self) -> bool {
        !matches!(self, HostType::String | HostType::Bytes | HostType::Object)
    }

    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, HostType::String)
    }

    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(
            self,
            HostType::Byte
                | HostType::SByte
                | HostType::Int16
                | HostType::UInt16
                | HostType::Int32
                | HostType::UInt32
                | HostType::Int64
                | HostType::UInt64
        )
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self, HostType::Single | HostType::Double | HostType::Decimal)
    }
}

impl core::fmt::Display for HostType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A host type as handed to [`TypeMap::host_to_db_type`](crate::TypeMap::host_to_db_type).
///
/// Enumerations carry their underlying integral type, which is what gets mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostTypeRef<'a> {
    Known(HostType),
    Named(&'a str),
    /// An enumeration; `None` means the language default (`int`)
    Enum { underlying: Option<&'a str> },
}

impl<'a> From<&'a str> for HostTypeRef<'a> {
    fn from(name: &'a str) -> Self {
        HostTypeRef::Named(name)
    }
}

impl From<HostType> for HostTypeRef<'_> {
    fn from(ty: HostType) -> Self {
        HostTypeRef::Known(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for ty in HostType::ALL {
            assert_eq!(HostType::from_type_name(ty.keyword()), Some(*ty));
        }
    }

    #[test]
    fn test_framework_names() {
        assert_eq!(HostType::from_type_name("Int64"), Some(HostType::Int64));
        assert_eq!(HostType::from_type_name("System.String"), Some(HostType::String));
        assert_eq!(
            HostType::from_type_name("global::System.Guid"),
            Some(HostType::Guid)
        );
        assert_eq!(
            HostType::from_type_name("Nullable<DateTime>"),
            Some(HostType::DateTime)
        );
        assert_eq!(HostType::from_type_name("byte []"), Some(HostType::Bytes));
    }

    #[test]
    fn test_non_scalar_types() {
        assert_eq!(HostType::from_type_name("Post"), None);
        assert_eq!(HostType::from_type_name("ICollection<Post>"), None);
        assert_eq!(HostType::from_type_name("int[]"), None);
    }

    #[test]
    fn test_value_types() {
        assert!(HostType::Int32.is_value_type());
        assert!(HostType::Guid.is_value_type());
        assert!(!HostType::String.is_value_type());
        assert!(!HostType::Bytes.is_value_type());
        assert!(!HostType::Object.is_value_type());
    }
}
