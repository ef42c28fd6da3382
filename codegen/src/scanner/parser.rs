//! Recursive descent over the token stream
//!
//! Only declarations are understood. Method bodies, field initializers and
//! everything else a model file does not need are skipped by balancing
//! delimiters.

use super::diagnostics::{self as codes, Diagnostic};
use super::lexer::{Token, TokenKind};
use crate::introspect::{Literal, MetadataArgument, TypeKind};

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "static",
    "abstract",
    "virtual",
    "override",
    "sealed",
    "readonly",
    "new",
    "const",
    "extern",
    "unsafe",
    "volatile",
    "fixed",
];

/// Modifiers that are also valid identifiers; only taken when another word follows
const CONTEXTUAL_MODIFIERS: &[&str] = &["partial", "required", "async", "file", "ref"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Modifiers {
    pub is_public: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_sealed: bool,
    pub is_partial: bool,
}

impl Modifiers {
    pub fn is_overridable(&self) -> bool {
        (self.is_virtual || self.is_abstract || self.is_override) && !self.is_sealed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AttributeDecl {
    /// Name as written, possibly qualified
    pub name: String,
    /// `property` in `[property: Key]`
    pub target: Option<String>,
    pub args: Vec<MetadataArgument>,
    pub offset: usize,
}

impl AttributeDecl {
    fn applies_to_declaration(&self) -> bool {
        matches!(self.target.as_deref(), None | Some("property" | "type"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PropertyDecl {
    pub name: String,
    pub ty: String,
    pub modifiers: Modifiers,
    pub attributes: Vec<AttributeDecl>,
    pub initializer: Option<Literal>,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TypeDecl {
    pub name: String,
    pub offset: usize,
    pub namespace: Option<String>,
    /// Index of the enclosing type in the declaration list
    pub parent: Option<usize>,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub attributes: Vec<AttributeDecl>,
    pub base_types: Vec<String>,
    pub enum_underlying: Option<String>,
    pub properties: Vec<PropertyDecl>,
    /// `Member = literal` assignments of the parameterless constructor
    pub ctor_defaults: Vec<(String, Literal)>,
}

/// Parse every type declaration, outer types before the types they contain
pub(crate) fn parse<'s>(source: &'s str, tokens: &[Token<'s>]) -> Result<Vec<TypeDecl>, Diagnostic> {
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        namespace: None,
        namespace_depth: 0,
        decls: Vec::new(),
    };
    parser.compilation_unit()?;
    Ok(parser.decls)
}

fn is_punct(token: &Token<'_>, punct: &str) -> bool {
    matches!(token.kind, TokenKind::Punct(p) if p == punct)
}

fn is_keyword(token: &Token<'_>, keyword: &str) -> bool {
    matches!(token.kind, TokenKind::Ident(word) if word == keyword)
}

fn closer_of(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

fn expected(token: &str, offset: usize) -> Diagnostic {
    match token {
        ";" => Diagnostic::new(offset, codes::SEMICOLON_EXPECTED, "; expected"),
        "{" => Diagnostic::new(offset, codes::OPEN_BRACE_EXPECTED, "{ expected"),
        "}" => Diagnostic::new(offset, codes::CLOSE_BRACE_EXPECTED, "} expected"),
        ")" => Diagnostic::new(offset, codes::CLOSE_PAREN_EXPECTED, ") expected"),
        _ => Diagnostic::new(
            offset,
            codes::SYNTAX_ERROR,
            format!("Syntax error, '{token}' expected"),
        ),
    }
}

/// Value of a numeric literal, suffixes and separators included
fn parse_number(text: &str) -> Option<Literal> {
    let clean: String = text
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    if let Some(hex) = clean.strip_prefix("0x") {
        let digits = hex.trim_end_matches(['u', 'l']);
        return i64::from_str_radix(digits, 16).ok().map(Literal::Integer);
    }
    if let Some(bin) = clean.strip_prefix("0b") {
        let digits = bin.trim_end_matches(['u', 'l']);
        return i64::from_str_radix(digits, 2).ok().map(Literal::Integer);
    }
    if let Some(real) = clean.strip_suffix(['m', 'd', 'f']) {
        return real.parse::<f64>().ok().map(Literal::Float);
    }
    let integral = clean.trim_end_matches(['u', 'l']);
    if integral.contains(['.', 'e']) {
        return integral.parse::<f64>().ok().map(Literal::Float);
    }
    integral.parse::<i64>().ok().map(Literal::Integer)
}

fn token_literal(token: &Token<'_>) -> Option<Literal> {
    match &token.kind {
        TokenKind::Str(Some(value)) => Some(Literal::String(value.clone())),
        TokenKind::Char(c) => Some(Literal::Char(*c)),
        TokenKind::Number(text) => parse_number(text),
        TokenKind::Ident("true") => Some(Literal::Bool(true)),
        TokenKind::Ident("false") => Some(Literal::Bool(false)),
        TokenKind::Ident("null") => Some(Literal::Null),
        _ => None,
    }
}

struct Parser<'s, 't> {
    source: &'s str,
    tokens: &'t [Token<'s>],
    pos: usize,
    namespace: Option<String>,
    /// Enclosing block namespaces; a namespace at depth 0 starts a new file scope
    namespace_depth: usize,
    decls: Vec<TypeDecl>,
}

impl<'s, 't> Parser<'s, 't> {
    // =========================================================================
    // Cursor
    // =========================================================================

    fn peek(&self) -> Option<&'t Token<'s>> {
        self.tokens.get(self.pos)
    }

    fn nth(&self, n: usize) -> Option<&'t Token<'s>> {
        self.tokens.get(self.pos + n)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<&'t Token<'s>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.source.len(), |t| t.offset)
    }

    fn at_punct(&self, punct: &str) -> bool {
        self.peek().is_some_and(|t| is_punct(t, punct))
    }

    fn nth_is_punct(&self, n: usize, punct: &str) -> bool {
        self.nth(n).is_some_and(|t| is_punct(t, punct))
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| is_keyword(t, keyword))
    }

    fn nth_is_ident(&self, n: usize) -> bool {
        matches!(self.nth(n).map(|t| &t.kind), Some(TokenKind::Ident(_)))
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        let found = self.at_punct(punct);
        if found {
            self.pos += 1;
        }
        found
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.at_keyword(keyword);
        if found {
            self.pos += 1;
        }
        found
    }

    /// Diagnostic for `token` missing before the token at `index`
    fn missing(&self, index: usize, token: &str) -> Diagnostic {
        let offset = if index >= self.tokens.len() {
            self.source.len()
        } else if index == 0 {
            0
        } else {
            self.tokens[index - 1].end()
        };
        expected(token, offset)
    }

    fn expect_punct(&mut self, punct: &str) -> Result<(), Diagnostic> {
        if self.eat_punct(punct) {
            Ok(())
        } else {
            Err(self.missing(self.pos, punct))
        }
    }

    fn ident(&mut self) -> Result<(&'s str, usize), Diagnostic> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(name),
                offset,
                ..
            }) => {
                self.pos += 1;
                Ok((*name, *offset))
            }
            _ => Err(Diagnostic::new(
                self.offset(),
                codes::IDENTIFIER_EXPECTED,
                "Identifier expected",
            )),
        }
    }

    fn qualified_name(&mut self) -> Result<String, Diagnostic> {
        let (first, _) = self.ident()?;
        let mut name = first.to_string();
        while (self.at_punct(".") || self.at_punct("::")) && self.nth_is_ident(1) {
            if let Some(separator) = self.advance() {
                name.push_str(separator.text);
            }
            let (part, _) = self.ident()?;
            name.push_str(part);
        }
        Ok(name)
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Consume a delimited group starting at the current opener
    fn skip_balanced(&mut self) -> Result<(), Diagnostic> {
        let mut stack: Vec<&'static str> = Vec::new();
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::Punct(open @ ("(" | "[" | "{")) => stack.push(closer_of(open)),
                TokenKind::Punct(close @ (")" | "]" | "}")) => {
                    match stack.pop() {
                        Some(want) if want == close => {}
                        Some(want) => return Err(expected(want, token.offset)),
                        None => return Err(self.missing(self.pos - 1, ";")),
                    }
                    if stack.is_empty() {
                        return Ok(());
                    }
                }
                _ => {}
            }
            if stack.is_empty() {
                return Ok(());
            }
        }
        Err(expected(stack.last().copied().unwrap_or("}"), self.source.len()))
    }

    /// Consume a `<...>` group at the current token
    fn skip_angle(&mut self) -> Result<(), Diagnostic> {
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            if is_punct(token, "<") {
                depth += 1;
            } else if is_punct(token, ">") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(expected(">", self.source.len()))
    }

    /// Index of the first terminator at nesting depth zero
    fn expression_end(&self, terminators: &[&str]) -> Result<usize, Diagnostic> {
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(self.pos) {
            if let TokenKind::Punct(p) = token.kind {
                if depth == 0 && terminators.contains(&p) {
                    return Ok(index);
                }
                match p {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => {
                        if depth == 0 {
                            return Err(self.missing(index, terminators[0]));
                        }
                        depth -= 1;
                    }
                    _ => {}
                }
            }
        }
        Err(self.missing(self.tokens.len(), terminators[0]))
    }

    fn skip_past(&mut self, terminator: &str) -> Result<(), Diagnostic> {
        self.pos = self.expression_end(&[terminator])? + 1;
        Ok(())
    }

    /// `where` clauses, then a block, an arrow body or `;`
    fn skip_method_body(&mut self) -> Result<(), Diagnostic> {
        if self.at_keyword("where") {
            while !self.at_punct("{") && !self.at_punct("=>") && !self.at_punct(";") {
                if self.advance().is_none() {
                    return Err(expected("{", self.source.len()));
                }
            }
        }
        if self.at_punct("{") {
            self.skip_balanced()
        } else if self.eat_punct("=>") {
            self.skip_past(";")
        } else {
            self.expect_punct(";")
        }
    }

    /// Skip up to and including a parameter list, then the body
    fn skip_signature_and_body(&mut self) -> Result<(), Diagnostic> {
        while !self.at_punct("(") {
            if self.advance().is_none() {
                return Err(expected("(", self.source.len()));
            }
        }
        self.skip_balanced()?;
        self.skip_method_body()
    }

    fn skip_accessor_body(&mut self) -> Result<(), Diagnostic> {
        if self.at_punct("{") {
            self.skip_balanced()
        } else {
            self.skip_past(";")
        }
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn literal(&self, start: usize, end: usize) -> Literal {
        let all: &'t [Token<'s>] = self.tokens;
        let tokens = &all[start..end];
        let parsed = match tokens {
            [single] => token_literal(single),
            [minus, number] if is_punct(minus, "-") => match token_literal(number) {
                Some(Literal::Integer(i)) => Some(Literal::Integer(-i)),
                Some(Literal::Float(f)) => Some(Literal::Float(-f)),
                _ => None,
            },
            [null, bang] if is_keyword(null, "null") && is_punct(bang, "!") => Some(Literal::Null),
            [ty, dot, empty]
                if (is_keyword(ty, "string") || is_keyword(ty, "String"))
                    && is_punct(dot, ".")
                    && is_keyword(empty, "Empty") =>
            {
                Some(Literal::String(String::new()))
            }
            _ => None,
        };
        parsed.unwrap_or_else(|| match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => {
                Literal::Expression(self.source[first.offset..last.end()].to_string())
            }
            _ => Literal::Expression(String::new()),
        })
    }

    /// Literal up to (not including) one of `terminators`
    fn value(&mut self, terminators: &[&str]) -> Result<Literal, Diagnostic> {
        let missing = self.peek().is_none_or(|t| {
            terminators
                .iter()
                .chain(&[")", "]", "}"])
                .any(|p| is_punct(t, p))
        });
        if missing {
            let found = self.peek().map_or("", |t| t.text);
            return Err(Diagnostic::new(
                self.offset(),
                codes::INVALID_EXPRESSION,
                format!("Invalid expression term '{found}'"),
            ));
        }
        let start = self.pos;
        let end = self.expression_end(terminators)?;
        self.pos = end;
        Ok(self.literal(start, end))
    }

    // =========================================================================
    // Types and attributes
    // =========================================================================

    /// A type reference, rendered back to text (`List<int>`, `string?`, `byte[]`)
    fn type_syntax(&mut self) -> Result<String, Diagnostic> {
        let mut ty = String::new();
        if self.at_punct("(") {
            let start = self.offset();
            self.skip_balanced()?;
            let end = self.tokens[self.pos - 1].end();
            ty.push_str(&self.source[start..end]);
        } else {
            ty.push_str(&self.qualified_name()?);
            if self.at_punct("<") {
                self.pos += 1;
                ty.push('<');
                loop {
                    if !self.at_punct(",") && !self.at_punct(">") {
                        ty.push_str(&self.type_syntax()?);
                    }
                    if self.eat_punct(",") {
                        ty.push_str(", ");
                        continue;
                    }
                    break;
                }
                self.expect_punct(">")?;
                ty.push('>');
                while self.at_punct(".") && self.nth_is_ident(1) {
                    self.pos += 1;
                    ty.push('.');
                    ty.push_str(&self.type_syntax()?);
                }
            }
        }
        loop {
            if self.eat_punct("?") {
                ty.push('?');
            } else if self.eat_punct("*") {
                ty.push('*');
            } else if self.at_punct("[") && (self.nth_is_punct(1, "]") || self.nth_is_punct(1, ",")) {
                self.pos += 1;
                ty.push('[');
                while self.eat_punct(",") {
                    ty.push(',');
                }
                self.expect_punct("]")?;
                ty.push(']');
            } else {
                break;
            }
        }
        Ok(ty)
    }

    fn at_type_keyword(&self) -> bool {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Ident("class" | "struct" | "interface" | "enum")) => true,
            Some(TokenKind::Ident("record")) => self.nth_is_ident(1),
            _ => false,
        }
    }

    fn modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        while let Some(Token {
            kind: TokenKind::Ident(word),
            ..
        }) = self.peek()
        {
            let contextual = CONTEXTUAL_MODIFIERS.contains(word) && self.nth_is_ident(1);
            if !MODIFIERS.contains(word) && !contextual {
                break;
            }
            match *word {
                "public" => modifiers.is_public = true,
                "static" => modifiers.is_static = true,
                "abstract" => modifiers.is_abstract = true,
                "virtual" => modifiers.is_virtual = true,
                "override" => modifiers.is_override = true,
                "sealed" => modifiers.is_sealed = true,
                "partial" => modifiers.is_partial = true,
                _ => {}
            }
            self.pos += 1;
        }
        modifiers
    }

    fn attributes(&mut self) -> Result<Vec<AttributeDecl>, Diagnostic> {
        let mut attributes = Vec::new();
        while self.eat_punct("[") {
            let target = if self.nth_is_punct(1, ":") {
                let (target, _) = self.ident()?;
                self.pos += 1;
                Some(target.to_string())
            } else {
                None
            };
            loop {
                let offset = self.offset();
                let name = self.qualified_name()?;
                let args = if self.at_punct("(") {
                    self.attribute_arguments()?
                } else {
                    Vec::new()
                };
                attributes.push(AttributeDecl {
                    name,
                    target: target.clone(),
                    args,
                    offset,
                });
                if self.eat_punct(",") && !self.at_punct("]") {
                    continue;
                }
                break;
            }
            self.expect_punct("]")?;
        }
        Ok(attributes)
    }

    fn attribute_arguments(&mut self) -> Result<Vec<MetadataArgument>, Diagnostic> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        if self.eat_punct(")") {
            return Ok(args);
        }
        loop {
            let name = match (self.peek(), self.nth(1)) {
                (
                    Some(Token {
                        kind: TokenKind::Ident(name),
                        ..
                    }),
                    Some(next),
                ) if is_punct(next, "=") || is_punct(next, ":") => {
                    self.pos += 2;
                    Some(name.to_string())
                }
                _ => None,
            };
            let value = self.value(&[",", ")"])?;
            args.push(MetadataArgument { name, value });
            if self.eat_punct(",") {
                continue;
            }
            self.expect_punct(")")?;
            return Ok(args);
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn compilation_unit(&mut self) -> Result<(), Diagnostic> {
        while !self.is_eof() {
            if self.at_punct("}") {
                return Err(Diagnostic::new(
                    self.offset(),
                    codes::DEFINITION_EXPECTED,
                    "Type or namespace definition, or end-of-file expected",
                ));
            }
            self.namespace_member()?;
        }
        Ok(())
    }

    fn namespace_member(&mut self) -> Result<(), Diagnostic> {
        let global_using =
            self.at_keyword("global") && self.nth(1).is_some_and(|t| is_keyword(t, "using"));
        if self.at_keyword("using") || global_using {
            return self.skip_past(";");
        }
        if self.at_keyword("extern") && self.nth(1).is_some_and(|t| is_keyword(t, "alias")) {
            return self.skip_past(";");
        }
        if self.eat_keyword("namespace") {
            let name = self.qualified_name()?;
            // Merged fragments are separate files: a top-level declaration
            // never nests under an earlier fragment's file-scoped namespace
            let full = match &self.namespace {
                Some(outer) if self.namespace_depth > 0 => format!("{outer}.{name}"),
                _ => name,
            };
            if self.eat_punct(";") {
                self.namespace = Some(full);
                return Ok(());
            }
            self.expect_punct("{")?;
            let outer = self.namespace.replace(full);
            self.namespace_depth += 1;
            loop {
                if self.eat_punct("}") {
                    break;
                }
                if self.is_eof() {
                    return Err(expected("}", self.source.len()));
                }
                self.namespace_member()?;
            }
            self.namespace_depth -= 1;
            self.namespace = outer;
            self.eat_punct(";");
            return Ok(());
        }
        // Assembly-level attributes
        if self.at_punct("[")
            && self.nth(1).is_some_and(|t| is_keyword(t, "assembly") || is_keyword(t, "module"))
            && self.nth_is_punct(2, ":")
        {
            self.attributes()?;
            return Ok(());
        }

        let attributes = self.attributes()?;
        let modifiers = self.modifiers();
        if self.at_type_keyword() {
            return self.type_declaration(attributes, modifiers, None);
        }
        if self.eat_keyword("delegate") {
            return self.skip_past(";");
        }
        Err(Diagnostic::new(
            self.offset(),
            codes::NAMESPACE_MEMBER,
            "A namespace cannot directly contain members such as fields, methods or statements",
        ))
    }

    fn type_declaration(
        &mut self,
        attributes: Vec<AttributeDecl>,
        modifiers: Modifiers,
        parent: Option<usize>,
    ) -> Result<(), Diagnostic> {
        let mut is_record = false;
        let kind = match self.advance().map(|t| &t.kind) {
            Some(TokenKind::Ident("struct")) => TypeKind::Struct,
            Some(TokenKind::Ident("interface")) => TypeKind::Interface,
            Some(TokenKind::Ident("enum")) => TypeKind::Enum,
            Some(TokenKind::Ident("record")) => {
                is_record = true;
                if self.eat_keyword("struct") {
                    TypeKind::Struct
                } else {
                    self.eat_keyword("class");
                    TypeKind::Record
                }
            }
            _ => TypeKind::Class,
        };
        let (name, offset) = self.ident()?;
        if self.at_punct("<") {
            self.skip_angle()?;
        }

        let index = self.decls.len();
        self.decls.push(TypeDecl {
            name: name.to_string(),
            offset,
            namespace: self.namespace.clone(),
            parent,
            kind,
            modifiers,
            attributes: attributes
                .into_iter()
                .filter(AttributeDecl::applies_to_declaration)
                .collect(),
            base_types: Vec::new(),
            enum_underlying: None,
            properties: Vec::new(),
            ctor_defaults: Vec::new(),
        });

        if self.at_punct("(") {
            if is_record {
                let properties = self.positional_parameters()?;
                self.decls[index].properties.extend(properties);
            } else {
                // Primary constructor parameters are not members
                self.skip_balanced()?;
            }
        }
        if self.eat_punct(":") {
            let mut bases = Vec::new();
            loop {
                bases.push(self.type_syntax()?);
                if self.at_punct("(") {
                    self.skip_balanced()?;
                }
                if !self.eat_punct(",") {
                    break;
                }
            }
            if kind == TypeKind::Enum {
                self.decls[index].enum_underlying = bases.into_iter().next();
            } else {
                self.decls[index].base_types = bases;
            }
        }
        while self.at_keyword("where") {
            while !self.at_punct("{") && !self.at_punct(";") {
                if self.advance().is_none() {
                    return Err(expected("{", self.source.len()));
                }
            }
        }

        if self.eat_punct(";") {
            return Ok(());
        }
        if !self.at_punct("{") {
            return Err(self.missing(self.pos, "{"));
        }
        if kind == TypeKind::Enum {
            self.skip_balanced()?;
        } else {
            self.pos += 1;
            self.type_body(index)?;
        }
        self.eat_punct(";");
        Ok(())
    }

    /// `record Post(int Id, string Title = "")` parameters as public properties
    fn positional_parameters(&mut self) -> Result<Vec<PropertyDecl>, Diagnostic> {
        self.expect_punct("(")?;
        let mut properties = Vec::new();
        if self.eat_punct(")") {
            return Ok(properties);
        }
        loop {
            let attributes = self
                .attributes()?
                .into_iter()
                .filter(|a| a.target.as_deref() == Some("property"))
                .collect();
            while ["in", "ref", "out", "params", "scoped"]
                .iter()
                .any(|m| self.at_keyword(m))
                && self.nth_is_ident(1)
            {
                self.pos += 1;
            }
            let ty = self.type_syntax()?;
            let (name, offset) = self.ident()?;
            let initializer = if self.eat_punct("=") {
                Some(self.value(&[",", ")"])?)
            } else {
                None
            };
            properties.push(PropertyDecl {
                name: name.to_string(),
                ty,
                modifiers: Modifiers {
                    is_public: true,
                    ..Modifiers::default()
                },
                attributes,
                initializer,
                offset,
            });
            if self.eat_punct(",") {
                continue;
            }
            self.expect_punct(")")?;
            return Ok(properties);
        }
    }

    /// Members up to and including the closing brace
    fn type_body(&mut self, index: usize) -> Result<(), Diagnostic> {
        let type_name = self.decls[index].name.clone();
        loop {
            if self.eat_punct("}") {
                return Ok(());
            }
            if self.is_eof() {
                return Err(expected("}", self.source.len()));
            }
            self.member(index, &type_name)?;
        }
    }

    fn member(&mut self, index: usize, type_name: &str) -> Result<(), Diagnostic> {
        let attributes = self.attributes()?;
        let modifiers = self.modifiers();

        if self.at_type_keyword() {
            return self.type_declaration(attributes, modifiers, Some(index));
        }
        if self.eat_punct(";") {
            return Ok(());
        }
        if self.eat_keyword("delegate") {
            return self.skip_past(";");
        }
        if self.eat_keyword("event") {
            self.type_syntax()?;
            self.ident()?;
            return self.skip_accessor_body();
        }
        if self.eat_punct("~") || self.eat_keyword("implicit") || self.eat_keyword("explicit") {
            return self.skip_signature_and_body();
        }
        if self.at_keyword(type_name) && self.nth_is_punct(1, "(") {
            self.pos += 1;
            return self.constructor(index, modifiers);
        }
        match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(_),
                ..
            }) => {}
            Some(token) if is_punct(token, "(") => {}
            Some(token) => {
                return Err(Diagnostic::new(
                    token.offset,
                    codes::INVALID_MEMBER_TOKEN,
                    format!(
                        "Invalid token '{}' in class, record, struct, or interface member declaration",
                        token.text
                    ),
                ));
            }
            None => return Err(expected("}", self.source.len())),
        }

        let ty = self.type_syntax()?;
        if self.eat_keyword("operator") {
            return self.skip_signature_and_body();
        }
        if self.at_keyword("this") && self.nth_is_punct(1, "[") {
            self.pos += 1;
            self.skip_balanced()?;
            return self.skip_accessor_body();
        }

        let (first, offset) = self.ident()?;
        let mut name = first;
        let mut explicit_interface = false;
        while self.at_punct(".") && self.nth_is_ident(1) {
            self.pos += 1;
            (name, _) = self.ident()?;
            explicit_interface = true;
        }

        let initializer = if self.at_punct("{") {
            self.skip_balanced()?;
            if self.eat_punct("=") {
                let value = self.value(&[";"])?;
                self.expect_punct(";")?;
                Some(value)
            } else {
                None
            }
        } else if self.eat_punct("=>") {
            self.skip_past(";")?;
            None
        } else if self.at_punct("(") || self.at_punct("<") {
            if self.at_punct("<") {
                self.skip_angle()?;
            }
            if !self.at_punct("(") {
                return Err(expected("(", self.offset()));
            }
            self.skip_balanced()?;
            return self.skip_method_body();
        } else if self.at_punct("=") || self.at_punct(";") || self.at_punct(",") {
            // Fields are not columns
            return self.skip_past(";");
        } else {
            return Err(self.missing(self.pos, ";"));
        };

        self.decls[index].properties.push(PropertyDecl {
            name: name.to_string(),
            ty,
            modifiers: Modifiers {
                is_public: modifiers.is_public && !explicit_interface,
                ..modifiers
            },
            attributes: attributes
                .into_iter()
                .filter(AttributeDecl::applies_to_declaration)
                .collect(),
            initializer,
            offset,
        });
        Ok(())
    }

    /// Constructor after its name; only a parameterless instance constructor is read
    fn constructor(&mut self, index: usize, modifiers: Modifiers) -> Result<(), Diagnostic> {
        let parameterless = self.nth_is_punct(1, ")");
        self.skip_balanced()?;
        if self.eat_punct(":") {
            self.ident()?;
            if !self.at_punct("(") {
                return Err(expected("(", self.offset()));
            }
            self.skip_balanced()?;
        }
        if !parameterless || modifiers.is_static {
            return self.skip_method_body();
        }
        if self.eat_punct("=>") {
            let start = self.pos;
            let end = self.expression_end(&[";"])?;
            self.assignment(index, start, end);
            self.pos = end + 1;
            return Ok(());
        }
        if self.eat_punct(";") {
            return Ok(());
        }
        self.expect_punct("{")?;
        loop {
            if self.eat_punct("}") {
                return Ok(());
            }
            if self.is_eof() {
                return Err(expected("}", self.source.len()));
            }
            if self.at_punct("{") {
                self.skip_balanced()?;
                continue;
            }
            let start = self.pos;
            let (end, terminated) = self.statement_end()?;
            if terminated {
                self.assignment(index, start, end);
                self.pos = end + 1;
            } else {
                self.pos = end;
            }
        }
    }

    /// End of the statement at the cursor: the index of its `;`, or the
    /// index after the block that closes it
    fn statement_end(&self) -> Result<(usize, bool), Diagnostic> {
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(self.pos) {
            let TokenKind::Punct(p) = token.kind else {
                continue;
            };
            match p {
                ";" if depth == 0 => return Ok((index, true)),
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    if depth == 0 {
                        return Err(self.missing(index, ";"));
                    }
                    depth -= 1;
                    let continues = self.tokens.get(index + 1).is_some_and(|next| {
                        ["else", "catch", "finally"]
                            .iter()
                            .any(|k| is_keyword(next, k))
                    });
                    if depth == 0 && p == "}" && !continues {
                        return Ok((index + 1, false));
                    }
                }
                _ => {}
            }
        }
        Err(expected("}", self.source.len()))
    }

    /// Record `[this.]Member = value` as a constructor default
    fn assignment(&mut self, index: usize, start: usize, end: usize) {
        let all: &'t [Token<'s>] = self.tokens;
        let statement = &all[start..end];
        let (target, value_start) = match statement {
            [this, dot, name, eq, _, ..]
                if is_keyword(this, "this") && is_punct(dot, ".") && is_punct(eq, "=") =>
            {
                (name, start + 4)
            }
            [name, eq, _, ..] if is_punct(eq, "=") => (name, start + 2),
            _ => return,
        };
        let TokenKind::Ident(member) = target.kind else {
            return;
        };
        let value = self.literal(value_start, end);
        self.decls[index]
            .ctor_defaults
            .push((member.to_string(), value));
    }
}
