//! Model source -> canonical tables
//!
//! [`ModelIntrospector`] owns the mapping policy: which declared types become
//! tables, which members become columns, and how nullability, keys, sizes and
//! defaults are inferred. Resolving the source itself is delegated to a
//! [`SourceIntrospector`].

mod port;
mod source;

pub use port::{
    Literal, MemberType, Metadata, MetadataArgument, MetadataExt, Nullability, ReferenceSet,
    ResolveRequest, ResolvedMember, ResolvedType, STANDARD_ANNOTATIONS, SourceIntrospector,
    TypeKind, attribute_name,
};
pub use source::{detect_nullable_context, merge_sources};

use crate::{DeclarationScanner, Error, Result};
use schemabridge_schema::{Column, DefaultNameConverter, NameConverter, Table};
use schemabridge_types::{HostType, HostTypeRef, TypeMap};

/// Description marker that flags a legacy primary key column
const PRIMARY_KEY_MARKER: &str = "主键";

/// Extracts [`Table`]s from model source text.
///
/// # Examples
///
/// ```
/// use schemabridge_codegen::ModelIntrospector;
/// use schemabridge_types::{Dialect, TypeMap};
///
/// let source = r#"
/// public class Post
/// {
///     public int Id { get; set; }
///     public string Title { get; set; }
/// }
/// "#;
/// let tables = ModelIntrospector::new()
///     .extract(TypeMap::for_dialect(Dialect::SqlServer), &[source])
///     .unwrap();
/// assert_eq!(tables[0].name, "Post");
/// assert!(tables[0].columns[0].is_primary_key);
/// ```
#[derive(Debug, Clone)]
pub struct ModelIntrospector<I = DeclarationScanner, N = DefaultNameConverter> {
    introspector: I,
    names: N,
    references: ReferenceSet,
}

impl ModelIntrospector {
    /// Built-in scanner with the default name converter
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(DeclarationScanner::new(), DefaultNameConverter)
    }
}

impl Default for ModelIntrospector {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, N> ModelIntrospector<I, N>
where
    I: SourceIntrospector,
    N: NameConverter,
{
    pub fn with_parts(introspector: I, names: N) -> Self {
        Self {
            introspector,
            names,
            references: ReferenceSet::standard(),
        }
    }

    /// Replace the reference set sent with every request
    pub fn with_references(mut self, references: ReferenceSet) -> Self {
        self.references = references;
        self
    }

    /// Swap the name converter
    pub fn with_names<M: NameConverter>(self, names: M) -> ModelIntrospector<I, M> {
        ModelIntrospector {
            introspector: self.introspector,
            names,
            references: self.references,
        }
    }

    /// Extract one table per concrete model type declared across `sources`.
    ///
    /// Fails with [`Error::SourceCompilation`] if the sources cannot be
    /// resolved, and with [`Error::UnsupportedType`] if a mapped member's type
    /// has no db type in `dialect`. Either way no tables are returned.
    pub fn extract<S: AsRef<str>>(&self, dialect: &TypeMap, sources: &[S]) -> Result<Vec<Table>> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let merged = merge_sources(sources);
        let request = ResolveRequest {
            nullable_context: detect_nullable_context(&merged),
            source: merged,
            references: self.references.clone(),
        };

        let types = self
            .introspector
            .resolve(&request)
            .map_err(|diagnostics| Error::SourceCompilation { diagnostics })?;

        let mut tables = Vec::new();
        for ty in types.iter().filter(|t| t.is_model()) {
            let table = self.table_from_type(dialect, ty, request.nullable_context)?;
            if table.columns.is_empty() {
                crate::schemabridge_warn!("type has no mappable members", ty = ty.name.as_str());
                continue;
            }
            tables.push(table);
        }

        crate::schemabridge_trace!(
            "extract",
            dialect = dialect.dialect().as_str(),
            types = types.len(),
            tables = tables.len(),
        );
        Ok(tables)
    }

    fn table_from_type(
        &self,
        dialect: &TypeMap,
        ty: &ResolvedType,
        nullable_context: bool,
    ) -> Result<Table> {
        let table_attr = ty.metadata.find_metadata("Table");
        let name = table_attr
            .and_then(|m| m.positional(0))
            .and_then(Literal::as_str)
            .filter(|n| !n.is_empty())
            .map_or_else(|| self.names.model_to_table(&ty.name), str::to_string);

        let mut table = Table::new(name);
        table.schema = table_attr
            .and_then(|m| m.named("Schema"))
            .and_then(Literal::as_str)
            .map(str::to_string);
        table.description = description_of(&ty.metadata);

        for member in &ty.members {
            if let Some(column) = column_from_member(dialect, member, nullable_context)? {
                table.add_column(column);
            }
        }
        Ok(table)
    }
}

fn description_of(metadata: &[Metadata]) -> Option<String> {
    ["Description", "Comment"]
        .iter()
        .filter_map(|name| metadata.find_metadata(name))
        .find_map(|m| m.positional(0).and_then(Literal::as_str))
        .map(str::to_string)
}

/// Strip the nullable wrapper: `int?` / `Nullable<int>` -> (`int`, true)
pub(crate) fn unwrap_nullable(declared: &str) -> (&str, bool) {
    let declared = declared.trim();
    if let Some(inner) = declared.strip_suffix('?') {
        return (inner.trim_end(), true);
    }
    let bare = declared.strip_prefix("System.").unwrap_or(declared);
    if let Some(inner) = bare
        .strip_prefix("Nullable<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return (inner.trim(), true);
    }
    (declared, false)
}

fn is_mapped(member: &ResolvedMember) -> bool {
    if !member.is_public || member.is_static || member.metadata.has_metadata("NotMapped") {
        return false;
    }
    // Unannotated overridable members are navigation properties
    if member.is_overridable
        && !member.metadata.has_metadata("Column")
        && !member.metadata.has_metadata("Key")
    {
        return false;
    }
    true
}

fn column_from_member(
    dialect: &TypeMap,
    member: &ResolvedMember,
    nullable_context: bool,
) -> Result<Option<Column>> {
    if !is_mapped(member) {
        return Ok(None);
    }

    let (base_type, wrapped) = unwrap_nullable(&member.declared_type);
    let (db_type, is_value_type) = match &member.member_type {
        MemberType::Scalar => {
            let Some(host) = HostType::from_type_name(base_type) else {
                return Ok(None);
            };
            (dialect.host_to_db_type(host)?, host.is_value_type())
        }
        MemberType::Enum { underlying } => (
            dialect.host_to_db_type(HostTypeRef::Enum {
                underlying: underlying.as_deref(),
            })?,
            true,
        ),
        MemberType::Other => return Ok(None),
    };

    let metadata = member.metadata.as_slice();
    let name = metadata
        .find_metadata("Column")
        .and_then(|m| m.positional(0))
        .and_then(Literal::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or(&member.name);

    let mut column = Column::new(name, db_type);
    column.description = description_of(metadata);

    column.is_nullable = if nullable_context {
        member.nullability != Nullability::NotNull
    } else if is_value_type && !wrapped {
        false
    } else {
        !metadata.has_metadata("Required")
    };

    column.is_primary_key = metadata.has_metadata("Key")
        || member.name == "Id"
        || column
            .description
            .as_deref()
            .is_some_and(|d| d.contains(PRIMARY_KEY_MARKER));

    column.size = ["StringLength", "MaxLength"]
        .iter()
        .filter_map(|attr| metadata.find_metadata(attr))
        .find_map(|m| m.positional(0).and_then(Literal::as_i64))
        .unwrap_or_else(|| dialect.default_size_for(db_type));

    if !column.is_nullable {
        column.default_value = member
            .instance_default
            .as_ref()
            .and_then(Literal::to_default_value)
            .filter(|v| !v.is_zero());
    }

    Ok(Some(column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemabridge_schema::DefaultValue;
    use schemabridge_types::Dialect;

    fn canned(
        types: Vec<ResolvedType>,
    ) -> impl Fn(&ResolveRequest) -> std::result::Result<Vec<ResolvedType>, Vec<String>> {
        move |_: &ResolveRequest| -> std::result::Result<Vec<ResolvedType>, Vec<String>> {
            Ok(types.clone())
        }
    }

    fn sqlserver() -> &'static TypeMap {
        TypeMap::for_dialect(Dialect::SqlServer)
    }

    #[test]
    fn test_unwrap_nullable() {
        assert_eq!(unwrap_nullable("int?"), ("int", true));
        assert_eq!(unwrap_nullable("Nullable<Guid>"), ("Guid", true));
        assert_eq!(unwrap_nullable("System.Nullable<int>"), ("int", true));
        assert_eq!(unwrap_nullable("string"), ("string", false));
    }

    #[test]
    fn test_column_policy_without_nullable_context() {
        let post = ResolvedType::class("Post")
            .with_member(ResolvedMember::scalar("Id", "int"))
            .with_member(
                ResolvedMember::scalar("Title", "string")
                    .with_metadata(Metadata::new("Required"))
                    .with_metadata(Metadata::new("StringLength").with_arg(Literal::Integer(200))),
            )
            .with_member(ResolvedMember::scalar("Body", "string"))
            .with_member(ResolvedMember::scalar("Views", "int?"))
            .with_member(ResolvedMember::scalar("Rating", "Nullable<double>"));

        let introspector = ModelIntrospector::with_parts(canned(vec![post]), DefaultNameConverter);
        let tables = introspector.extract(sqlserver(), &["class Post {}"]).unwrap();
        let table = &tables[0];

        let id = table.column("Id").unwrap();
        assert!(id.is_primary_key);
        assert!(!id.is_nullable);
        assert_eq!(id.db_type, "int");
        assert_eq!(id.size, 4);

        let title = table.column("Title").unwrap();
        assert!(!title.is_nullable);
        assert_eq!(title.size, 200);
        assert_eq!(title.db_type, "nvarchar");

        assert!(table.column("Body").unwrap().is_nullable);
        assert!(table.column("Views").unwrap().is_nullable);
        assert!(table.column("Rating").unwrap().is_nullable);
    }

    #[test]
    fn test_nullable_context_uses_resolved_state() {
        let post = ResolvedType::class("Post")
            .with_member(
                ResolvedMember::scalar("Title", "string").with_nullability(Nullability::NotNull),
            )
            .with_member(ResolvedMember::scalar("Subtitle", "string?"))
            .with_member(ResolvedMember::scalar("Legacy", "string"));

        let introspector = ModelIntrospector::with_parts(canned(vec![post]), DefaultNameConverter);
        let tables = introspector
            .extract(sqlserver(), &["#nullable enable"])
            .unwrap();
        let table = &tables[0];
        assert!(!table.column("Title").unwrap().is_nullable);
        assert!(table.column("Subtitle").unwrap().is_nullable);
        assert!(table.column("Legacy").unwrap().is_nullable);
    }

    #[test]
    fn test_skipped_members() {
        let mut navigation = ResolvedMember::scalar("Blog", "Blog");
        navigation.member_type = MemberType::Other;
        let mut virtual_scalar = ResolvedMember::scalar("Cached", "int");
        virtual_scalar.is_overridable = true;
        let mut virtual_column = ResolvedMember::scalar("Rev", "int");
        virtual_column.is_overridable = true;
        virtual_column.metadata.push(Metadata::new("Column"));
        let mut hidden = ResolvedMember::scalar("Secret", "string");
        hidden.is_public = false;
        let mut shared = ResolvedMember::scalar("Count", "int");
        shared.is_static = true;

        let post = ResolvedType::class("Post")
            .with_member(ResolvedMember::scalar("Id", "int"))
            .with_member(navigation)
            .with_member(virtual_scalar)
            .with_member(virtual_column)
            .with_member(hidden)
            .with_member(shared)
            .with_member(
                ResolvedMember::scalar("Draft", "bool").with_metadata(Metadata::new("NotMapped")),
            );

        let introspector = ModelIntrospector::with_parts(canned(vec![post]), DefaultNameConverter);
        let tables = introspector.extract(sqlserver(), &["x"]).unwrap();
        let names: Vec<_> = tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Rev"]);
    }

    #[test]
    fn test_table_and_column_annotations() {
        let user = ResolvedType::class("User")
            .with_metadata(
                Metadata::new("Table")
                    .with_arg(Literal::String("tabUser".into()))
                    .with_named_arg("Schema", Literal::String("dbo".into())),
            )
            .with_metadata(Metadata::new("Description").with_arg(Literal::String("users".into())))
            .with_member(
                ResolvedMember::scalar("UserId", "long")
                    .with_metadata(Metadata::new("Description").with_arg(Literal::String("主键".into()))),
            )
            .with_member(
                ResolvedMember::scalar("Name", "string")
                    .with_metadata(Metadata::new("Column").with_arg(Literal::String("user_name".into()))),
            );

        let introspector = ModelIntrospector::with_parts(canned(vec![user]), DefaultNameConverter);
        let tables = introspector.extract(sqlserver(), &["x"]).unwrap();
        let table = &tables[0];
        assert_eq!(table.name, "tabUser");
        assert_eq!(table.schema.as_deref(), Some("dbo"));
        assert_eq!(table.description.as_deref(), Some("users"));
        assert!(table.column("UserId").unwrap().is_primary_key);
        assert_eq!(table.column("user_name").unwrap().db_type, "nvarchar");
        assert_eq!(table.column("user_name").unwrap().size, 64);
    }

    #[test]
    fn test_enum_members_use_underlying_type() {
        let mut status = ResolvedMember::scalar("Status", "PostStatus");
        status.member_type = MemberType::Enum {
            underlying: Some("byte".into()),
        };
        let mut kind = ResolvedMember::scalar("Kind", "PostKind?");
        kind.member_type = MemberType::Enum { underlying: None };

        let post = ResolvedType::class("Post").with_member(status).with_member(kind);
        let introspector = ModelIntrospector::with_parts(canned(vec![post]), DefaultNameConverter);
        let tables = introspector.extract(sqlserver(), &["x"]).unwrap();
        let table = &tables[0];
        assert_eq!(table.column("Status").unwrap().db_type, "tinyint");
        assert!(!table.column("Status").unwrap().is_nullable);
        assert_eq!(table.column("Kind").unwrap().db_type, "int");
        assert!(table.column("Kind").unwrap().is_nullable);
    }

    #[test]
    fn test_default_values() {
        let post = ResolvedType::class("Post")
            .with_member(ResolvedMember::scalar("Score", "int").with_default(Literal::Integer(10)))
            .with_member(ResolvedMember::scalar("Zero", "int").with_default(Literal::Integer(0)))
            .with_member(ResolvedMember::scalar("Flag", "bool").with_default(Literal::Bool(true)))
            .with_member(
                ResolvedMember::scalar("Note", "string")
                    .with_default(Literal::String("n/a".into())),
            )
            .with_member(
                ResolvedMember::scalar("Code", "string")
                    .with_metadata(Metadata::new("Required"))
                    .with_default(Literal::String("X".into())),
            );

        let introspector = ModelIntrospector::with_parts(canned(vec![post]), DefaultNameConverter);
        let tables = introspector.extract(sqlserver(), &["x"]).unwrap();
        let table = &tables[0];
        assert_eq!(
            table.column("Score").unwrap().default_value,
            Some(DefaultValue::Integer(10))
        );
        assert_eq!(table.column("Zero").unwrap().default_value, None);
        assert_eq!(
            table.column("Flag").unwrap().default_value,
            Some(DefaultValue::Bool(true))
        );
        // nullable columns never carry a default
        assert_eq!(table.column("Note").unwrap().default_value, None);
        assert_eq!(
            table.column("Code").unwrap().default_value,
            Some(DefaultValue::Text("X".into()))
        );
    }

    #[test]
    fn test_empty_string_is_an_explicit_default() {
        let post = ResolvedType::class("Post")
            .with_member(
                ResolvedMember::scalar("Title", "string")
                    .with_metadata(Metadata::new("Required"))
                    .with_default(Literal::String(String::new())),
            )
            .with_member(ResolvedMember::scalar("Sep", "char").with_default(Literal::Char('\0')))
            .with_member(ResolvedMember::scalar("Mark", "char").with_default(Literal::Char('*')));

        let introspector = ModelIntrospector::with_parts(canned(vec![post]), DefaultNameConverter);
        let tables = introspector.extract(sqlserver(), &["x"]).unwrap();
        let table = &tables[0];
        assert_eq!(
            table.column("Title").unwrap().default_value,
            Some(DefaultValue::Text(String::new()))
        );
        assert_eq!(table.column("Sep").unwrap().default_value, None);
        assert_eq!(
            table.column("Mark").unwrap().default_value,
            Some(DefaultValue::Text("*".into()))
        );
    }

    #[test]
    fn test_non_model_and_empty_types_are_skipped() {
        let mut base = ResolvedType::class("EntityBase").with_member(ResolvedMember::scalar("Id", "int"));
        base.is_abstract = true;
        let mut nav = ResolvedMember::scalar("Posts", "List<Post>");
        nav.member_type = MemberType::Other;
        let empty = ResolvedType::class("Blog").with_member(nav);
        let post = ResolvedType::class("Post").with_member(ResolvedMember::scalar("Id", "int"));

        let introspector =
            ModelIntrospector::with_parts(canned(vec![base, empty, post]), DefaultNameConverter);
        let tables = introspector.extract(sqlserver(), &["x"]).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "Post");
    }

    #[test]
    fn test_resolution_failure_is_reported_verbatim() {
        let failing = |_: &ResolveRequest| -> std::result::Result<Vec<ResolvedType>, Vec<String>> {
            Err(vec![
                "(1,1): error CS1001: Identifier expected".to_string(),
                "(2,1): error CS1513: } expected".to_string(),
            ])
        };
        let introspector = ModelIntrospector::with_parts(failing, DefaultNameConverter);
        let err = introspector.extract(sqlserver(), &["x"]).unwrap_err();
        match &err {
            Error::SourceCompilation { diagnostics } => assert_eq!(diagnostics.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("Compile error:\n(1,1)"));
    }

    #[test]
    fn test_unsupported_type_aborts_extract() {
        let mut member = ResolvedMember::scalar("Status", "Status");
        member.member_type = MemberType::Enum {
            underlying: Some("string".into()),
        };
        let post = ResolvedType::class("Post").with_member(member);
        let introspector = ModelIntrospector::with_parts(canned(vec![post]), DefaultNameConverter);
        assert!(matches!(
            introspector.extract(sqlserver(), &["x"]),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_request_carries_merged_source_and_context() {
        let check = |req: &ResolveRequest| -> std::result::Result<Vec<ResolvedType>, Vec<String>> {
            assert!(req.nullable_context);
            assert!(req.source.starts_with("using System;\n"));
            assert!(req.references.contains("Key"));
            Ok(Vec::new())
        };
        let introspector = ModelIntrospector::with_parts(check, DefaultNameConverter);
        let tables = introspector
            .extract(
                sqlserver(),
                &["using System;\nclass A { string? B; }", "using System;"],
            )
            .unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_empty_sources() {
        let tables = ModelIntrospector::new()
            .extract::<&str>(sqlserver(), &[])
            .unwrap();
        assert!(tables.is_empty());
    }
}
