//! Compiler-style diagnostics
//!
//! Rendered as `(line,col): error CSxxxx: message`, the shape C# tooling prints
//! for in-memory sources.

use std::fmt;

pub(crate) const DUPLICATE_TYPE: &str = "CS0101";
pub(crate) const DUPLICATE_NESTED_TYPE: &str = "CS0102";
pub(crate) const NAMESPACE_MEMBER: &str = "CS0116";
pub(crate) const TYPE_NOT_FOUND: &str = "CS0246";
pub(crate) const IDENTIFIER_EXPECTED: &str = "CS1001";
pub(crate) const SEMICOLON_EXPECTED: &str = "CS1002";
pub(crate) const SYNTAX_ERROR: &str = "CS1003";
pub(crate) const NEWLINE_IN_CONSTANT: &str = "CS1010";
pub(crate) const EMPTY_CHAR: &str = "CS1011";
pub(crate) const TOO_MANY_CHARS: &str = "CS1012";
pub(crate) const DEFINITION_EXPECTED: &str = "CS1022";
pub(crate) const CLOSE_PAREN_EXPECTED: &str = "CS1026";
pub(crate) const COMMENT_NOT_CLOSED: &str = "CS1035";
pub(crate) const UNTERMINATED_STRING: &str = "CS1039";
pub(crate) const INVALID_EXPRESSION: &str = "CS1525";
pub(crate) const UNEXPECTED_CHAR: &str = "CS1056";
pub(crate) const CLOSE_BRACE_EXPECTED: &str = "CS1513";
pub(crate) const OPEN_BRACE_EXPECTED: &str = "CS1514";
pub(crate) const INVALID_MEMBER_TOKEN: &str = "CS1519";

/// One error found while scanning, positioned by byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub offset: usize,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(offset: usize, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            offset,
            code,
            message: message.into(),
        }
    }

    /// Attach a line/column position within `source`
    #[must_use]
    pub fn located<'a>(&'a self, index: &LineIndex<'_>) -> Located<'a> {
        let (line, column) = index.position(self.offset);
        Located {
            line,
            column,
            diagnostic: self,
        }
    }
}

/// A diagnostic with its 1-based line and column
#[derive(Debug)]
pub struct Located<'a> {
    pub line: usize,
    pub column: usize,
    pub diagnostic: &'a Diagnostic,
}

impl fmt::Display for Located<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}): error {}: {}",
            self.line, self.column, self.diagnostic.code, self.diagnostic.message
        )
    }
}

/// Byte offset -> line/column lookup
#[derive(Debug)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// 1-based (line, column); columns count characters
    #[must_use]
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .source
            .get(start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let source = "ab\ncd\n\nx";
        let index = LineIndex::new(source);
        assert_eq!(index.position(0), (1, 1));
        assert_eq!(index.position(1), (1, 2));
        assert_eq!(index.position(3), (2, 1));
        assert_eq!(index.position(7), (4, 1));
        assert_eq!(index.position(100), (4, 2));
    }

    #[test]
    fn test_rendering() {
        let source = "class A\n{\n  int x\n";
        let index = LineIndex::new(source);
        let diagnostic = Diagnostic::new(source.len(), CLOSE_BRACE_EXPECTED, "} expected");
        assert_eq!(
            diagnostic.located(&index).to_string(),
            "(4,1): error CS1513: } expected"
        );
    }
}
