//! Model generation options

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Namespaces a modern SDK-style project imports implicitly
pub const DEFAULT_IMPLICIT_IMPORTS: &[&str] = &[
    "System",
    "System.Collections.Generic",
    "System.IO",
    "System.Linq",
    "System.Net.Http",
    "System.Threading",
    "System.Threading.Tasks",
];

/// Imports needed by the data annotations the generator emits
pub(crate) const ANNOTATION_IMPORTS: &[&str] = &[
    "System.ComponentModel",
    "System.ComponentModel.DataAnnotations",
    "System.ComponentModel.DataAnnotations.Schema",
];

/// Options for rendering model source.
///
/// Immutable per call: the generator only reads them.
///
/// # Examples
///
/// ```
/// use schemabridge_codegen::GenerateOptions;
///
/// let options = GenerateOptions::default()
///     .with_namespace("Blog.Models")
///     .with_annotations(true)
///     .with_indent("\t");
/// assert_eq!(options.namespace, "Blog.Models");
/// assert!(options.implicit_import_set.contains("System"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GenerateOptions {
    /// Namespace of the generated type; empty for none
    pub namespace: String,
    pub type_prefix: String,
    pub type_suffix: String,
    /// One level of indentation
    pub indent_unit: String,
    /// Emit doc comments and `Table`/`Column`/`Key`/`StringLength`/`Description` attributes
    pub emit_annotations: bool,
    /// Private backing fields with accessor pairs instead of auto-properties
    pub emit_encapsulated_fields: bool,
    /// Mark nullable reference-typed members with `?`
    pub nullable_types_enabled: bool,
    /// `namespace X;` instead of a namespace block
    pub file_scoped_namespace: bool,
    /// Skip imports already covered by `implicit_import_set`
    pub implicit_imports_enabled: bool,
    pub implicit_import_set: BTreeSet<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            namespace: "Models".to_string(),
            type_prefix: String::new(),
            type_suffix: String::new(),
            indent_unit: "  ".to_string(),
            emit_annotations: false,
            emit_encapsulated_fields: false,
            nullable_types_enabled: false,
            file_scoped_namespace: false,
            implicit_imports_enabled: false,
            implicit_import_set: DEFAULT_IMPLICIT_IMPORTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl GenerateOptions {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.type_prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.type_suffix = suffix.into();
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent_unit = indent.into();
        self
    }

    pub fn with_annotations(mut self, enabled: bool) -> Self {
        self.emit_annotations = enabled;
        self
    }

    pub fn with_encapsulated_fields(mut self, enabled: bool) -> Self {
        self.emit_encapsulated_fields = enabled;
        self
    }

    pub fn with_nullable_types(mut self, enabled: bool) -> Self {
        self.nullable_types_enabled = enabled;
        self
    }

    pub fn with_file_scoped_namespace(mut self, enabled: bool) -> Self {
        self.file_scoped_namespace = enabled;
        self
    }

    pub fn with_implicit_imports(mut self, enabled: bool) -> Self {
        self.implicit_imports_enabled = enabled;
        self
    }

    /// Replace the implicit import set
    pub fn with_implicit_import_set<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implicit_import_set = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `namespace` is imported implicitly
    #[must_use]
    pub fn is_implicitly_imported(&self, namespace: &str) -> bool {
        self.implicit_imports_enabled && self.implicit_import_set.contains(namespace)
    }
}
