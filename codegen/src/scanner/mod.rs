//! Built-in [`SourceIntrospector`] for declarative model files.
//!
//! [`DeclarationScanner`] reads the subset of C# that model files are written
//! in: namespaces, classes, records, structs, enums, attributes, properties,
//! literal initializers and literal assignments in a parameterless
//! constructor. It does not evaluate code. Anything it cannot follow is
//! reported as a compiler-style diagnostic.

mod diagnostics;
mod lexer;
mod parser;

pub use diagnostics::{Diagnostic, LineIndex, Located};

use diagnostics as codes;

use std::collections::{HashMap, HashSet};

use crate::introspect::{
    MemberType, Metadata, Nullability, ReferenceSet, ResolveRequest, ResolvedMember,
    ResolvedType, SourceIntrospector, TypeKind, attribute_name, unwrap_nullable,
};
use parser::{PropertyDecl, TypeDecl};
use schemabridge_types::HostType;

/// Declaration scanner over in-memory source text
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationScanner;

impl DeclarationScanner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve the request's source, or every diagnostic that prevents it
    pub fn scan(&self, request: &ResolveRequest) -> Result<Vec<ResolvedType>, Vec<Diagnostic>> {
        let source = request.source.as_str();
        let tokens = lexer::tokenize(source).map_err(|d| vec![d])?;
        let decls = parser::parse(source, &tokens).map_err(|d| vec![d])?;
        let decls = merge_partials(decls)?;
        check_attributes(&decls, &request.references)?;

        crate::schemabridge_trace!("scan", tokens = tokens.len(), types = decls.len());
        Ok(resolve_types(&decls, request.nullable_context))
    }
}

impl SourceIntrospector for DeclarationScanner {
    fn resolve(&self, request: &ResolveRequest) -> Result<Vec<ResolvedType>, Vec<String>> {
        self.scan(request).map_err(|diagnostics| {
            let index = LineIndex::new(&request.source);
            diagnostics
                .iter()
                .map(|d| d.located(&index).to_string())
                .collect()
        })
    }
}

/// Fold `partial` declarations into their first part and report true duplicates
fn merge_partials(decls: Vec<TypeDecl>) -> Result<Vec<TypeDecl>, Vec<Diagnostic>> {
    let mut merged: Vec<TypeDecl> = Vec::with_capacity(decls.len());
    let mut full_names: Vec<String> = Vec::with_capacity(decls.len());
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut remap = Vec::with_capacity(decls.len());
    let mut diagnostics = Vec::new();

    for mut decl in decls {
        decl.parent = decl.parent.map(|p| remap[p]);
        let full_name = match (decl.parent, &decl.namespace) {
            (Some(parent), _) => format!("{}+{}", full_names[parent], decl.name),
            (None, Some(ns)) => format!("{ns}.{}", decl.name),
            (None, None) => decl.name.clone(),
        };

        let Some(&existing) = by_name.get(&full_name) else {
            by_name.insert(full_name.clone(), merged.len());
            remap.push(merged.len());
            full_names.push(full_name);
            merged.push(decl);
            continue;
        };
        remap.push(existing);

        let target = &mut merged[existing];
        if target.modifiers.is_partial && decl.modifiers.is_partial && target.kind == decl.kind {
            target.modifiers.is_public |= decl.modifiers.is_public;
            target.modifiers.is_abstract |= decl.modifiers.is_abstract;
            target.modifiers.is_static |= decl.modifiers.is_static;
            target.attributes.extend(decl.attributes);
            target.base_types.extend(decl.base_types);
            target.properties.extend(decl.properties);
            target.ctor_defaults.extend(decl.ctor_defaults);
            continue;
        }

        let diagnostic = match decl.parent {
            Some(parent) => Diagnostic::new(
                decl.offset,
                codes::DUPLICATE_NESTED_TYPE,
                format!(
                    "The type '{}' already contains a definition for '{}'",
                    merged[parent].name, decl.name
                ),
            ),
            None => Diagnostic::new(
                decl.offset,
                codes::DUPLICATE_TYPE,
                format!(
                    "The namespace '{}' already contains a definition for '{}'",
                    decl.namespace.as_deref().unwrap_or("<global namespace>"),
                    decl.name
                ),
            ),
        };
        diagnostics.push(diagnostic);
    }

    if diagnostics.is_empty() {
        Ok(merged)
    } else {
        Err(diagnostics)
    }
}

/// Every applied attribute must be in the reference set or declared in the source
fn check_attributes(decls: &[TypeDecl], references: &ReferenceSet) -> Result<(), Vec<Diagnostic>> {
    let declared: HashSet<&str> = decls
        .iter()
        .filter(|d| d.kind == TypeKind::Class)
        .filter(|d| {
            d.name.ends_with("Attribute")
                || d.base_types.iter().any(|b| b.ends_with("Attribute"))
        })
        .map(|d| attribute_name(&d.name))
        .collect();

    let diagnostics: Vec<Diagnostic> = decls
        .iter()
        .flat_map(|d| {
            d.attributes
                .iter()
                .chain(d.properties.iter().flat_map(|p| &p.attributes))
        })
        .filter(|a| {
            let short = attribute_name(&a.name);
            !references.contains(short) && !declared.contains(short)
        })
        .map(|a| {
            Diagnostic::new(
                a.offset,
                codes::TYPE_NOT_FOUND,
                format!(
                    "The type or namespace name '{}' could not be found (are you missing a using directive or an assembly reference?)",
                    a.name
                ),
            )
        })
        .collect();

    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Types declared in the source that members may refer to
struct LocalTypes<'a> {
    enums: HashMap<&'a str, Option<String>>,
    structs: HashSet<&'a str>,
}

fn resolve_types(decls: &[TypeDecl], nullable_context: bool) -> Vec<ResolvedType> {
    let locals = LocalTypes {
        enums: decls
            .iter()
            .filter(|d| d.kind == TypeKind::Enum)
            .map(|d| (d.name.as_str(), d.enum_underlying.clone()))
            .collect(),
        structs: decls
            .iter()
            .filter(|d| d.kind == TypeKind::Struct)
            .map(|d| d.name.as_str())
            .collect(),
    };

    decls
        .iter()
        .enumerate()
        .map(|(index, decl)| ResolvedType {
            name: decl.name.clone(),
            namespace: decl.namespace.clone(),
            kind: decl.kind,
            is_public: is_exported(decls, index),
            is_abstract: decl.modifiers.is_abstract,
            is_static: decl.modifiers.is_static,
            metadata: to_metadata(&decl.attributes),
            members: decl
                .properties
                .iter()
                .map(|p| resolve_member(p, decl, &locals, nullable_context))
                .collect(),
        })
        .collect()
}

/// Public all the way out through enclosing types
fn is_exported(decls: &[TypeDecl], index: usize) -> bool {
    let decl = &decls[index];
    decl.modifiers.is_public && decl.parent.is_none_or(|p| is_exported(decls, p))
}

fn to_metadata(attributes: &[parser::AttributeDecl]) -> Vec<Metadata> {
    attributes
        .iter()
        .map(|a| {
            let mut metadata = Metadata::new(&a.name);
            metadata.arguments = a.args.clone();
            metadata
        })
        .collect()
}

fn resolve_member(
    property: &PropertyDecl,
    decl: &TypeDecl,
    locals: &LocalTypes<'_>,
    nullable_context: bool,
) -> ResolvedMember {
    let (base, wrapped) = unwrap_nullable(&property.ty);
    let simple = base.rsplit('.').next().unwrap_or(base);

    let (member_type, is_value_type) = if let Some(host) = HostType::from_type_name(base) {
        (MemberType::Scalar, host.is_value_type())
    } else if let Some(underlying) = locals.enums.get(simple) {
        (
            MemberType::Enum {
                underlying: underlying.clone(),
            },
            true,
        )
    } else {
        (MemberType::Other, locals.structs.contains(simple))
    };

    let nullability = if wrapped {
        Nullability::Nullable
    } else if is_value_type || nullable_context {
        Nullability::NotNull
    } else {
        Nullability::Unknown
    };

    // The constructor runs after initializers
    let instance_default = decl
        .ctor_defaults
        .iter()
        .rev()
        .find(|(name, _)| *name == property.name)
        .map(|(_, value)| value.clone())
        .or_else(|| property.initializer.clone());

    ResolvedMember {
        name: property.name.clone(),
        declared_type: property.ty.clone(),
        member_type,
        nullability,
        metadata: to_metadata(&property.attributes),
        is_public: property.modifiers.is_public,
        is_static: property.modifiers.is_static,
        is_overridable: property.modifiers.is_overridable(),
        instance_default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::Literal;
    use pretty_assertions::assert_eq;

    fn request(source: &str) -> ResolveRequest {
        ResolveRequest {
            source: source.to_string(),
            references: ReferenceSet::standard(),
            nullable_context: crate::introspect::detect_nullable_context(source),
        }
    }

    fn scan(source: &str) -> Vec<ResolvedType> {
        DeclarationScanner::new().scan(&request(source)).unwrap()
    }

    fn messages(source: &str) -> Vec<String> {
        DeclarationScanner::new().resolve(&request(source)).unwrap_err()
    }

    #[test]
    fn test_members_resolve_against_local_types() {
        let types = scan(
            r"
namespace Shop
{
    public enum Status : byte { Open, Closed }
    public enum Kind { A, B }
    public struct Money { public decimal Amount { get; set; } }

    public class Order
    {
        public int Id { get; set; }
        public Status State { get; set; }
        public Kind? Category { get; set; }
        public Money Total { get; set; }
        public Customer Customer { get; set; }
        public string Note { get; set; }
    }
}
",
        );
        assert_eq!(types.len(), 4);
        let order = types.iter().find(|t| t.name == "Order").unwrap();
        assert_eq!(order.namespace.as_deref(), Some("Shop"));
        assert!(order.is_model());

        let kinds: Vec<_> = order.members.iter().map(|m| m.member_type.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                MemberType::Scalar,
                MemberType::Enum {
                    underlying: Some("byte".into())
                },
                MemberType::Enum { underlying: None },
                MemberType::Other,
                MemberType::Other,
                MemberType::Scalar,
            ]
        );
        let nullability: Vec<_> = order.members.iter().map(|m| m.nullability).collect();
        assert_eq!(
            nullability,
            vec![
                Nullability::NotNull,
                Nullability::NotNull,
                Nullability::Nullable,
                Nullability::NotNull,
                Nullability::Unknown,
                Nullability::Unknown,
            ]
        );
    }

    #[test]
    fn test_nullable_context_marks_reference_types_not_null() {
        let types = scan("public class A { public string Name { get; set; } = null!; public string? Nick { get; set; } }");
        let members = &types[0].members;
        assert_eq!(members[0].nullability, Nullability::NotNull);
        assert_eq!(members[0].instance_default, Some(Literal::Null));
        assert_eq!(members[1].nullability, Nullability::Nullable);
    }

    #[test]
    fn test_visibility_of_nested_types() {
        let types = scan(
            r"
public class Outer
{
    public class Visible { public int Id { get; set; } }
    private class Hidden { public int Id { get; set; } }
}
class Internal
{
    public class Inner { public int Id { get; set; } }
}
",
        );
        let public: Vec<_> = types
            .iter()
            .filter(|t| t.is_public)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(public, vec!["Outer", "Visible"]);
    }

    #[test]
    fn test_constructor_defaults_win_over_initializers() {
        let types = scan(
            r#"
public class Settings
{
    public Settings() { Theme = "light"; }
    public string Theme { get; set; } = "dark";
    public int Retries { get; set; } = 3;
}
"#,
        );
        let members = &types[0].members;
        assert_eq!(members[0].instance_default, Some(Literal::String("light".into())));
        assert_eq!(members[1].instance_default, Some(Literal::Integer(3)));
    }

    #[test]
    fn test_partial_classes_merge() {
        let types = scan(
            r"
public partial class Post { public int Id { get; set; } }
partial class Post { public string Title { get; set; } }
",
        );
        assert_eq!(types.len(), 1);
        let names: Vec<_> = types[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Title"]);
        assert!(types[0].is_public);
    }

    #[test]
    fn test_metadata_uses_short_names() {
        let types = scan(
            r#"
[System.ComponentModel.DataAnnotations.Schema.TableAttribute("posts")]
public class Post
{
    [KeyAttribute]
    public int PostId { get; set; }
}
"#,
        );
        assert_eq!(types[0].metadata[0].name, "Table");
        assert_eq!(types[0].members[0].metadata[0].name, "Key");
    }

    #[test]
    fn test_duplicate_types_are_reported() {
        let errors = messages("public class A { }\npublic class A { }");
        assert_eq!(
            errors,
            vec!["(2,14): error CS0101: The namespace '<global namespace>' already contains a definition for 'A'"]
        );

        let errors = messages("namespace N { class O { class I { } class I { } } }");
        assert_eq!(
            errors,
            vec!["(1,43): error CS0102: The type 'O' already contains a definition for 'I'"]
        );
    }

    #[test]
    fn test_unknown_attributes_are_reported() {
        let errors = messages(
            "public class A\n{\n    [Audited]\n    public int Id { get; set; }\n    [Unknown(1)]\n    public int B { get; set; }\n}",
        );
        assert_eq!(
            errors,
            vec![
                "(3,6): error CS0246: The type or namespace name 'Audited' could not be found (are you missing a using directive or an assembly reference?)",
                "(5,6): error CS0246: The type or namespace name 'Unknown' could not be found (are you missing a using directive or an assembly reference?)",
            ]
        );
    }

    #[test]
    fn test_attributes_declared_in_source_are_known() {
        let types = scan(
            r"
public class AuditedAttribute : System.Attribute { }
public class A { [Audited] public int Id { get; set; } }
",
        );
        assert_eq!(types[1].members[0].metadata[0].name, "Audited");
    }

    #[test]
    fn test_extra_references_are_known() {
        let mut request = request("public class A { [Audited] public int Id { get; set; } }");
        request.references = ReferenceSet::standard().with(["Audited"]);
        assert!(DeclarationScanner::new().scan(&request).is_ok());
    }

    #[test]
    fn test_syntax_error_is_located() {
        let errors = messages("public class Post\n{\n    public int Id { get; set; }\n");
        assert_eq!(errors, vec!["(4,1): error CS1513: } expected"]);

        let errors = messages("public class Post\n{\n    public string Title = \"oops\n}");
        assert_eq!(errors, vec!["(3,27): error CS1010: Newline in constant"]);
    }
}
