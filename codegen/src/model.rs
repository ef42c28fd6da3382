//! Canonical table -> C# model source

use crate::options::ANNOTATION_IMPORTS;
use crate::{Error, GenerateOptions, Result};
use schemabridge_schema::{Column, DefaultNameConverter, DefaultValue, NameConverter, Table};
use schemabridge_types::{HostType, TypeMap};

/// C# reserved keywords; identifiers spelled like these get a verbatim `@`
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Renders one model class per table.
///
/// # Examples
///
/// ```
/// use schemabridge_codegen::{GenerateOptions, ModelGenerator};
/// use schemabridge_schema::{Column, Table};
/// use schemabridge_types::{Dialect, TypeMap};
///
/// let table = Table::new("Post")
///     .with_column(Column::new("Id", "int").primary_key().not_null())
///     .with_column(Column::new("Title", "nvarchar"));
/// let code = ModelGenerator::new()
///     .render(&table, &GenerateOptions::default(), TypeMap::for_dialect(Dialect::SqlServer))
///     .unwrap();
/// assert!(code.contains("public class Post"));
/// assert!(code.contains("public int Id { get; set; }"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelGenerator<N = DefaultNameConverter> {
    names: N,
}

impl ModelGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: NameConverter> ModelGenerator<N> {
    pub fn with_names(names: N) -> Self {
        Self { names }
    }

    /// `{prefix}{Model}{suffix}` for the table
    pub fn model_name(&self, table: &Table, options: &GenerateOptions) -> String {
        identifier(&format!(
            "{}{}{}",
            options.type_prefix,
            self.names.table_to_model(&table.name),
            options.type_suffix
        ))
    }

    /// File name the model for `table` is written to
    pub fn render_file_name(&self, table: &Table, options: &GenerateOptions) -> String {
        format!("{}.cs", self.model_name(table, options))
    }

    /// Render the model source for `table`.
    ///
    /// Fails with [`Error::InvalidArgument`] for a table without a name or
    /// columns, and with [`Error::UnsupportedType`] for a column whose db type
    /// `dialect` does not know.
    pub fn render(
        &self,
        table: &Table,
        options: &GenerateOptions,
        dialect: &TypeMap,
    ) -> Result<String> {
        if table.name.trim().is_empty() {
            return Err(Error::InvalidArgument("table name is empty".to_string()));
        }
        if table.columns.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "table `{}` has no columns",
                table.name
            )));
        }

        let mut out = SourceWriter::new(&options.indent_unit);

        let mut imports = Vec::new();
        if !options.is_implicitly_imported("System") {
            imports.push("System");
        }
        if options.emit_annotations {
            imports.extend(ANNOTATION_IMPORTS);
        }
        for namespace in &imports {
            out.line(format!("using {namespace};"));
        }
        if !imports.is_empty() {
            out.blank();
        }

        let namespace = options.namespace.trim();
        let namespace_block = !namespace.is_empty() && !options.file_scoped_namespace;
        if !namespace.is_empty() {
            if options.file_scoped_namespace {
                out.line(format!("namespace {namespace};"));
                out.blank();
            } else {
                out.line(format!("namespace {namespace}"));
                out.line("{");
                out.indent();
            }
        }

        if options.emit_annotations
            && let Some(description) = table.description_text()
        {
            let description = single_line(description);
            out.doc_summary(&description);
            match table.schema.as_deref().filter(|s| !s.is_empty()) {
                Some(schema) => out.line(format!(
                    "[Table(\"{}\", Schema = \"{}\")]",
                    escape(&table.name),
                    escape(schema)
                )),
                None => out.line(format!("[Table(\"{}\")]", escape(&table.name))),
            }
            out.line(format!("[Description(\"{}\")]", escape(&description)));
        }

        out.line(format!("public class {}", self.model_name(table, options)));
        out.line("{");
        out.indent();
        for (index, column) in table.columns.iter().enumerate() {
            if index > 0 {
                out.blank();
            }
            render_member(&mut out, column, options, dialect)?;
        }
        out.dedent();
        out.line("}");

        if namespace_block {
            out.dedent();
            out.line("}");
        }

        crate::schemabridge_trace!(
            "render_model",
            table = table.name.as_str(),
            columns = table.columns.len(),
        );
        Ok(out.finish())
    }
}

fn render_member(
    out: &mut SourceWriter<'_>,
    column: &Column,
    options: &GenerateOptions,
    dialect: &TypeMap,
) -> Result<()> {
    let mut host = dialect.db_type_to_host_type(&column.db_type, column.is_nullable)?;
    if column.is_nullable && options.nullable_types_enabled && !host.ends_with('?') {
        host.push('?');
    }
    let property = identifier(&column.name);
    let initializer = column
        .default_value
        .as_ref()
        .filter(|_| !column.is_nullable)
        .and_then(|value| {
            let host_type = dialect.mapping(&column.db_type)?.host_type;
            default_literal(value, host_type)
        })
        .map(|literal| format!(" = {literal}"))
        .unwrap_or_default();

    if options.emit_encapsulated_fields {
        let field = identifier(&private_field_name(&column.name));
        out.line(format!("private {host} {field}{initializer};"));
        if options.emit_annotations {
            annotate(out, column, &host, true);
        }
        out.line(format!("public {host} {property}"));
        out.line("{");
        out.indent();
        out.line(format!("get {{ return {field}; }}"));
        out.line(format!("set {{ {field} = value; }}"));
        out.dedent();
        out.line("}");
    } else {
        if options.emit_annotations {
            annotate(out, column, &host, false);
        }
        let terminator = if initializer.is_empty() { "" } else { ";" };
        out.line(format!(
            "public {host} {property} {{ get; set; }}{initializer}{terminator}"
        ));
    }
    Ok(())
}

fn annotate(out: &mut SourceWriter<'_>, column: &Column, host: &str, encapsulated: bool) {
    match column.description_text() {
        Some(description) => {
            let description = single_line(description);
            out.doc_summary(&description);
            out.line(format!("[Description(\"{}\")]", escape(&description)));
        }
        None if encapsulated && column.is_primary_key => {
            out.line("[Description(\"PrimaryKey\")]");
        }
        None => {}
    }
    if column.is_primary_key {
        out.line("[Key]");
    }
    if host.trim_end_matches('?') == "string"
        && column.size > 0
        && column.size < i64::from(i32::MAX)
    {
        out.line(format!("[StringLength({})]", column.size));
    }
    out.line(format!("[Column(\"{}\")]", escape(&column.name)));
}

/// A C# literal for `value` when it fits `host`
fn default_literal(value: &DefaultValue, host: HostType) -> Option<String> {
    match (value, host) {
        (DefaultValue::Bool(b), HostType::Bool) => Some(b.to_string()),
        (DefaultValue::Integer(i), _) if host.is_integral() => Some(i.to_string()),
        (DefaultValue::Integer(i), HostType::Single) => Some(format!("{i}f")),
        (DefaultValue::Integer(i), HostType::Double) => Some(i.to_string()),
        (DefaultValue::Integer(i), HostType::Decimal) => Some(format!("{i}m")),
        (DefaultValue::Float(f), HostType::Single) => Some(format!("{f:?}f")),
        (DefaultValue::Float(f), HostType::Double) => Some(format!("{f:?}")),
        (DefaultValue::Float(f), HostType::Decimal) => Some(format!("{f:?}m")),
        (DefaultValue::Text(s), HostType::String) => Some(format!("\"{}\"", escape(s))),
        (DefaultValue::Text(s), HostType::Char) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some('\''), None) => Some("'\\''".to_string()),
                (Some('\\'), None) => Some("'\\\\'".to_string()),
                (Some(c), None) => Some(format!("'{c}'")),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Backing field name: `ID` -> `id`, `Name` -> `name`, `name` -> `_name`
fn private_field_name(name: &str) -> String {
    if name.trim().is_empty() {
        return String::new();
    }
    if name == name.to_uppercase() {
        return name.to_lowercase();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => first.to_lowercase().chain(chars).collect(),
        _ => format!("_{name}"),
    }
}

/// A valid C# identifier spelling of `name`
fn identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if KEYWORDS.contains(&ident.as_str()) {
        ident.insert(0, '@');
    }
    ident
}

/// Escape for a regular string literal inside an attribute argument
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Line-oriented output with a configurable indentation unit
struct SourceWriter<'a> {
    buf: String,
    unit: &'a str,
    depth: usize,
}

impl<'a> SourceWriter<'a> {
    fn new(unit: &'a str) -> Self {
        Self {
            buf: String::new(),
            unit,
            depth: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(self.unit);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn doc_summary(&mut self, text: &str) {
        self.line("/// <summary>");
        self.line(format!("/// {}", xml_escape(text)));
        self.line("/// </summary>");
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn finish(self) -> String {
        self.buf.trim_end().to_string()
    }
}
