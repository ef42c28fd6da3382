//! The `SourceIntrospector` port and its serializable request/response shapes

use schemabridge_schema::DefaultValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attribute names every resolution request understands
pub const STANDARD_ANNOTATIONS: &[&str] = &[
    // System.ComponentModel.DataAnnotations.Schema
    "Table",
    "Column",
    "NotMapped",
    "DatabaseGenerated",
    "ForeignKey",
    "InverseProperty",
    "ComplexType",
    // System.ComponentModel.DataAnnotations
    "Key",
    "Required",
    "StringLength",
    "MaxLength",
    "MinLength",
    "Range",
    "RegularExpression",
    "EmailAddress",
    "Phone",
    "Url",
    "DataType",
    "Display",
    "Timestamp",
    "ConcurrencyCheck",
    "Compare",
    "Editable",
    // System.ComponentModel
    "Description",
    "DisplayName",
    "DefaultValue",
    "Browsable",
    "Category",
    // System
    "Serializable",
    "Obsolete",
    "Flags",
    "NonSerialized",
    // System.Diagnostics.CodeAnalysis
    "AllowNull",
    "DisallowNull",
    "MaybeNull",
    "NotNull",
    "SetsRequiredMembers",
];

/// Names the resolver treats as known attribute types
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReferenceSet {
    attributes: BTreeSet<String>,
}

impl Default for ReferenceSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReferenceSet {
    /// The standard annotation vocabulary
    #[must_use]
    pub fn standard() -> Self {
        Self {
            attributes: STANDARD_ANNOTATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// An empty set
    #[must_use]
    pub fn empty() -> Self {
        Self {
            attributes: BTreeSet::new(),
        }
    }

    /// Add caller-provided attribute names
    pub fn with<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.attributes
            .extend(names.into_iter().map(|n| attribute_name(n.as_ref()).to_string()));
        self
    }

    /// Whether an attribute, spelled as in source, is known.
    ///
    /// `Key`, `KeyAttribute` and `System.ComponentModel.DataAnnotations.Key` all match.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains(attribute_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }
}

/// Normalize an attribute name as written in source to its short form
#[must_use]
pub fn attribute_name(name: &str) -> &str {
    let name = name.rsplit(['.', ':']).next().unwrap_or(name);
    match name.strip_suffix("Attribute") {
        Some(short) if !short.is_empty() => short,
        _ => name,
    }
}

/// One resolution request
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    /// Merged model source text
    pub source: String,
    pub references: ReferenceSet,
    /// Whether nullable reference type annotations are in effect
    pub nullable_context: bool,
}

/// Resolves model source into declared types.
///
/// Failure carries every diagnostic message; there is no partial result.
pub trait SourceIntrospector {
    fn resolve(&self, request: &ResolveRequest) -> Result<Vec<ResolvedType>, Vec<String>>;
}

impl<F> SourceIntrospector for F
where
    F: Fn(&ResolveRequest) -> Result<Vec<ResolvedType>, Vec<String>>,
{
    fn resolve(&self, request: &ResolveRequest) -> Result<Vec<ResolvedType>, Vec<String>> {
        self(request)
    }
}

/// A literal value observed in source
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Char(char),
    String(String),
    /// Anything that is not a plain literal, as written
    Expression(String),
}

impl Literal {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The column default this literal stands for, if it is a plain value
    #[must_use]
    pub fn to_default_value(&self) -> Option<DefaultValue> {
        match self {
            Literal::Bool(b) => Some(DefaultValue::Bool(*b)),
            Literal::Integer(i) => Some(DefaultValue::Integer(*i)),
            Literal::Float(f) => Some(DefaultValue::Float(*f)),
            // `'\0'` is the zero value of `char`
            Literal::Char('\0') => None,
            Literal::Char(c) => Some(DefaultValue::Text(c.to_string())),
            Literal::String(s) => Some(DefaultValue::Text(s.clone())),
            Literal::Null | Literal::Expression(_) => None,
        }
    }
}

/// One argument of an attribute application
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MetadataArgument {
    /// Set for named arguments (`Schema = "dbo"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: Literal,
}

/// An attribute attached to a type or member
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Metadata {
    /// Short attribute name (`Key`, not `KeyAttribute`)
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<MetadataArgument>,
}

impl Metadata {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: attribute_name(name.as_ref()).to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arg(mut self, value: Literal) -> Self {
        self.arguments.push(MetadataArgument { name: None, value });
        self
    }

    pub fn with_named_arg(mut self, name: impl Into<String>, value: Literal) -> Self {
        self.arguments.push(MetadataArgument {
            name: Some(name.into()),
            value,
        });
        self
    }

    /// The `index`-th positional argument
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&Literal> {
        self.arguments
            .iter()
            .filter(|a| a.name.is_none())
            .nth(index)
            .map(|a| &a.value)
    }

    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Literal> {
        self.arguments
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
            .map(|a| &a.value)
    }
}

/// Lookup helpers over an attribute list
pub trait MetadataExt {
    fn find_metadata(&self, name: &str) -> Option<&Metadata>;

    fn has_metadata(&self, name: &str) -> bool {
        self.find_metadata(name).is_some()
    }
}

impl MetadataExt for [Metadata] {
    fn find_metadata(&self, name: &str) -> Option<&Metadata> {
        self.iter().find(|m| attribute_name(&m.name) == name)
    }
}

/// Kind of a declared type
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Class,
    Record,
    Struct,
    Interface,
    Enum,
}

/// Resolved nullability of a member
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Nullability {
    NotNull,
    Nullable,
    /// No annotation context applies
    #[default]
    Unknown,
}

/// What a member's declared type resolved to
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MemberType {
    /// A host scalar (`int`, `string`, `Guid`, `byte[]`)
    Scalar,
    /// An enumeration; `underlying` is `None` for the default `int`
    Enum { underlying: Option<String> },
    /// Anything else (navigation, collection, owned type)
    Other,
}

/// A public property-like member of a resolved type
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMember {
    pub name: String,
    /// Type as written, nullable marker included (`string?`, `int`)
    pub declared_type: String,
    pub member_type: MemberType,
    #[serde(default)]
    pub nullability: Nullability,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    pub is_public: bool,
    #[serde(default)]
    pub is_static: bool,
    /// `virtual`, `abstract` or `override` without `sealed`
    #[serde(default)]
    pub is_overridable: bool,
    /// Value observed on a freshly constructed instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_default: Option<Literal>,
}

impl ResolvedMember {
    /// A public instance scalar member with no metadata
    pub fn scalar(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        let nullability = if declared_type.ends_with('?') {
            Nullability::Nullable
        } else {
            Nullability::Unknown
        };
        Self {
            name: name.into(),
            declared_type,
            member_type: MemberType::Scalar,
            nullability,
            metadata: Vec::new(),
            is_public: true,
            is_static: false,
            is_overridable: false,
            instance_default: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    pub fn with_nullability(mut self, nullability: Nullability) -> Self {
        self.nullability = nullability;
        self
    }

    pub fn with_default(mut self, value: Literal) -> Self {
        self.instance_default = Some(value);
        self
    }
}

/// A type declared by the resolved source
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub kind: TypeKind,
    pub is_public: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default)]
    pub members: Vec<ResolvedMember>,
}

impl ResolvedType {
    /// A public concrete class
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            kind: TypeKind::Class,
            is_public: true,
            is_abstract: false,
            is_static: false,
            metadata: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: ResolvedMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    /// Concrete, exported class or record
    #[must_use]
    pub fn is_model(&self) -> bool {
        matches!(self.kind, TypeKind::Class | TypeKind::Record)
            && self.is_public
            && !self.is_abstract
            && !self.is_static
    }
}
