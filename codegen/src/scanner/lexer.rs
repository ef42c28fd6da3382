//! Tokenizer built from nom combinators
//!
//! Produces identifiers, literals and punctuation; whitespace, comments and
//! preprocessor directives are trivia.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while},
    character::complete::{char, multispace1, satisfy},
    combinator::{map, opt, recognize, value},
    error::{ErrorKind, ParseError},
    multi::many0,
    sequence::pair,
};

use super::diagnostics::{self as codes, Diagnostic};

/// Token payload
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind<'a> {
    /// Identifier or keyword, without a verbatim `@`
    Ident(&'a str),
    Number(&'a str),
    /// Decoded string; `None` for interpolated strings
    Str(Option<String>),
    Char(char),
    Punct(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Source text of the whole token
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexErrorKind {
    Nom(ErrorKind),
    NewlineInConstant,
    UnterminatedString,
    UnterminatedComment,
    EmptyChar,
    TooManyChars,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LexError<'a> {
    pub input: &'a str,
    pub kind: LexErrorKind,
}

impl<'a> ParseError<&'a str> for LexError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: LexErrorKind::Nom(kind),
        }
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

type LexResult<'a, O> = IResult<&'a str, O, LexError<'a>>;

fn fail<'a, O>(input: &'a str, kind: LexErrorKind) -> LexResult<'a, O> {
    Err(nom::Err::Failure(LexError { input, kind }))
}

fn lit<'a>(input: &'a str, expected: &'static str) -> LexResult<'a, &'a str> {
    tag(expected).parse(input)
}

// =============================================================================
// Trivia
// =============================================================================

fn line_comment(input: &str) -> LexResult<'_, &str> {
    recognize(pair(tag("//"), take_till(|c: char| c == '\n'))).parse(input)
}

fn block_comment(input: &str) -> LexResult<'_, &str> {
    let (body, _) = lit(input, "/*")?;
    match take_until::<_, _, LexError<'_>>("*/").parse(body) {
        Ok((rest, _)) => {
            let rest = &rest[2..];
            Ok((rest, &input[..input.len() - rest.len()]))
        }
        Err(_) => fail(input, LexErrorKind::UnterminatedComment),
    }
}

/// `#nullable enable`, `#region`, `#if` and friends
fn directive(input: &str) -> LexResult<'_, &str> {
    recognize(pair(char('#'), take_till(|c: char| c == '\n'))).parse(input)
}

fn trivia(input: &str) -> LexResult<'_, ()> {
    value(
        (),
        many0(alt((multispace1, line_comment, block_comment, directive))),
    )
    .parse(input)
}

// =============================================================================
// Literals
// =============================================================================

fn hex_value(digits: &str) -> char {
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or('\u{FFFD}')
}

/// Decode the escape sequence following a backslash; returns the char and bytes consumed
fn unescape(rest: &str) -> (char, usize) {
    let mut chars = rest.chars();
    let Some(c) = chars.next() else {
        return ('\\', 0);
    };
    let simple = match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'v' => Some('\u{0B}'),
        '\\' | '"' | '\'' => Some(c),
        _ => None,
    };
    if let Some(decoded) = simple {
        return (decoded, 1);
    }
    let max_digits = match c {
        'u' => 4,
        'x' => 4,
        'U' => 8,
        _ => return (c, c.len_utf8()),
    };
    let digits: String = rest[1..]
        .chars()
        .take(max_digits)
        .take_while(char::is_ascii_hexdigit)
        .collect();
    (hex_value(&digits), 1 + digits.len())
}

/// `"..."` with backslash escapes, single line
fn regular_string(input: &str) -> LexResult<'_, TokenKind<'_>> {
    let (body, _) = lit(input, "\"")?;
    let mut decoded = String::new();
    let mut i = 0;
    while let Some(c) = body[i..].chars().next() {
        match c {
            '"' => return Ok((&body[i + 1..], TokenKind::Str(Some(decoded)))),
            '\n' => break,
            '\\' => {
                let (ch, used) = unescape(&body[i + 1..]);
                decoded.push(ch);
                i += 1 + used;
            }
            _ => {
                decoded.push(c);
                i += c.len_utf8();
            }
        }
    }
    fail(input, LexErrorKind::NewlineInConstant)
}

/// Body of `@"..."` with doubled quotes, may span lines; returns bytes used
fn verbatim_body(body: &str) -> Option<(usize, String)> {
    let mut decoded = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '"' {
            if matches!(chars.peek(), Some((_, '"'))) {
                chars.next();
                decoded.push('"');
                continue;
            }
            return Some((i + 1, decoded));
        }
        decoded.push(c);
    }
    None
}

fn verbatim_string(input: &str) -> LexResult<'_, TokenKind<'_>> {
    let (body, _) = lit(input, "@\"")?;
    match verbatim_body(body) {
        Some((used, decoded)) => Ok((&body[used..], TokenKind::Str(Some(decoded)))),
        None => fail(input, LexErrorKind::UnterminatedString),
    }
}

/// `$"..."`, `$@"..."`, `@$"..."`; the value is not evaluated
fn interpolated_string(input: &str) -> LexResult<'_, TokenKind<'_>> {
    let (body, prefix) = lit(input, "$@\"")
        .or_else(|_| lit(input, "@$\""))
        .or_else(|_| lit(input, "$\""))?;
    if prefix.contains('@') {
        return match verbatim_body(body) {
            Some((used, _)) => Ok((&body[used..], TokenKind::Str(None))),
            None => fail(input, LexErrorKind::UnterminatedString),
        };
    }
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match c {
            '\n' => break,
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Ok((&body[i + 1..], TokenKind::Str(None))),
            _ => escaped = false,
        }
    }
    fail(input, LexErrorKind::NewlineInConstant)
}

/// Strip the closing line's indentation from every content line
fn dedent_raw(content: &str) -> String {
    if !content.contains('\n') {
        return content.to_string();
    }
    let mut lines: Vec<&str> = content.split('\n').collect();
    let closing = lines.pop().unwrap_or_default();
    let indent = closing.len() - closing.trim_start().len();
    lines
        .iter()
        .skip(1)
        .map(|line| line.get(indent..).unwrap_or(line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"""..."""` raw strings, optionally interpolated
fn raw_string(input: &str) -> LexResult<'_, TokenKind<'_>> {
    let rest = input.trim_start_matches('$');
    let dollars = &input[..input.len() - rest.len()];
    let body = rest.trim_start_matches('"');
    let quotes = &rest[..rest.len() - body.len()];
    if quotes.len() < 3 {
        return Err(nom::Err::Error(LexError::from_error_kind(
            input,
            ErrorKind::Tag,
        )));
    }
    match body.find(quotes) {
        Some(end) => {
            let content = &body[..end];
            let kind = if dollars.is_empty() {
                TokenKind::Str(Some(dedent_raw(content)))
            } else {
                TokenKind::Str(None)
            };
            Ok((&body[end + quotes.len()..], kind))
        }
        None => fail(input, LexErrorKind::UnterminatedString),
    }
}

fn char_literal(input: &str) -> LexResult<'_, TokenKind<'_>> {
    let (body, _) = lit(input, "'")?;
    let (value, used) = match body.chars().next() {
        None | Some('\n') => return fail(input, LexErrorKind::NewlineInConstant),
        Some('\'') => return fail(input, LexErrorKind::EmptyChar),
        Some('\\') => {
            let (c, used) = unescape(&body[1..]);
            (c, 1 + used)
        }
        Some(c) => (c, c.len_utf8()),
    };
    match body[used..].chars().next() {
        Some('\'') => Ok((&body[used + 1..], TokenKind::Char(value))),
        Some('\n') | None => fail(input, LexErrorKind::NewlineInConstant),
        Some(_) => fail(input, LexErrorKind::TooManyChars),
    }
}

fn number_text(input: &str) -> LexResult<'_, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_digit()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    ))
    .parse(input)
}

fn number(input: &str) -> LexResult<'_, TokenKind<'_>> {
    let (_, text) = number_text(input)?;
    // Member access on a literal (`1.ToString()`) keeps the dot out of the number
    let text = match text.find(|c: char| c == '.') {
        Some(dot) if !text[dot + 1..].starts_with(|c: char| c.is_ascii_digit()) => &text[..dot],
        _ => text,
    };
    Ok((&input[text.len()..], TokenKind::Number(text)))
}

fn identifier(input: &str) -> LexResult<'_, TokenKind<'_>> {
    map(
        pair(
            opt(char('@')),
            recognize(pair(
                satisfy(|c| c.is_alphabetic() || c == '_'),
                take_while(|c: char| c.is_alphanumeric() || c == '_'),
            )),
        ),
        |(_, name)| TokenKind::Ident(name),
    )
    .parse(input)
}

fn punct(input: &str) -> LexResult<'_, TokenKind<'_>> {
    map(
        alt((
            tag("=>"),
            tag("::"),
            tag("??"),
            tag("=="),
            tag("!="),
            tag("&&"),
            tag("||"),
            recognize(satisfy(|c| "{}()[]<>;,.:=?!+-*/%&|^~".contains(c))),
        )),
        TokenKind::Punct,
    )
    .parse(input)
}

fn token(input: &str) -> LexResult<'_, TokenKind<'_>> {
    alt((
        raw_string,
        interpolated_string,
        verbatim_string,
        regular_string,
        char_literal,
        number,
        identifier,
        punct,
    ))
    .parse(input)
}

// =============================================================================
// Driver
// =============================================================================

fn diagnostic(source: &str, at: &str, kind: LexErrorKind) -> Diagnostic {
    let offset = source.len() - at.len();
    match kind {
        LexErrorKind::NewlineInConstant => {
            Diagnostic::new(offset, codes::NEWLINE_IN_CONSTANT, "Newline in constant")
        }
        LexErrorKind::UnterminatedString => {
            Diagnostic::new(offset, codes::UNTERMINATED_STRING, "Unterminated string literal")
        }
        LexErrorKind::UnterminatedComment => Diagnostic::new(
            offset,
            codes::COMMENT_NOT_CLOSED,
            "End-of-file found, '*/' expected",
        ),
        LexErrorKind::EmptyChar => {
            Diagnostic::new(offset, codes::EMPTY_CHAR, "Empty character literal")
        }
        LexErrorKind::TooManyChars => Diagnostic::new(
            offset,
            codes::TOO_MANY_CHARS,
            "Too many characters in character literal",
        ),
        LexErrorKind::Nom(_) => {
            let c = at.chars().next().unwrap_or(' ');
            Diagnostic::new(
                offset,
                codes::UNEXPECTED_CHAR,
                format!("Unexpected character '{c}'"),
            )
        }
    }
}

/// Split `source` into tokens, stopping at the first lexical error
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token<'_>>, Diagnostic> {
    let mut tokens = Vec::new();
    let mut rest = source;
    loop {
        rest = match trivia(rest) {
            Ok((after, ())) => after,
            Err(nom::Err::Failure(e)) => return Err(diagnostic(source, e.input, e.kind)),
            Err(_) => rest,
        };
        if rest.is_empty() {
            break;
        }
        match token(rest) {
            Ok((after, kind)) => {
                let offset = source.len() - rest.len();
                let text = &rest[..rest.len() - after.len()];
                tokens.push(Token { kind, text, offset });
                rest = after;
            }
            Err(nom::Err::Failure(e)) => return Err(diagnostic(source, e.input, e.kind)),
            Err(_) => return Err(diagnostic(source, rest, LexErrorKind::Nom(ErrorKind::Alt))),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind<'_>> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("public string? Name { get; set; } = \"x\";"),
            vec![
                TokenKind::Ident("public"),
                TokenKind::Ident("string"),
                TokenKind::Punct("?"),
                TokenKind::Ident("Name"),
                TokenKind::Punct("{"),
                TokenKind::Ident("get"),
                TokenKind::Punct(";"),
                TokenKind::Ident("set"),
                TokenKind::Punct(";"),
                TokenKind::Punct("}"),
                TokenKind::Punct("="),
                TokenKind::Str(Some("x".into())),
                TokenKind::Punct(";"),
            ]
        );
    }

    #[test]
    fn test_trivia_is_skipped() {
        let source = "#nullable enable\n// line\n/* block\n */ int /** doc */ x";
        assert_eq!(
            kinds(source),
            vec![TokenKind::Ident("int"), TokenKind::Ident("x")]
        );
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(
            kinds(r#""a\"b\n" @"c""d" $"{x}" '\'' 'z' @class"#),
            vec![
                TokenKind::Str(Some("a\"b\n".into())),
                TokenKind::Str(Some("c\"d".into())),
                TokenKind::Str(None),
                TokenKind::Char('\''),
                TokenKind::Char('z'),
                TokenKind::Ident("class"),
            ]
        );
    }

    #[test]
    fn test_raw_string() {
        let source = "\"\"\"\n    hello\n      world\n    \"\"\"";
        assert_eq!(kinds(source), vec![TokenKind::Str(Some("hello\n  world".into()))]);
        assert_eq!(
            kinds(r#""""say "hi" """"#),
            vec![TokenKind::Str(Some("say \"hi\" ".into()))]
        );
    }

    #[test]
    fn test_numbers_and_punctuation() {
        assert_eq!(
            kinds("x => 1.5m + 0x1F ?? 10_000L"),
            vec![
                TokenKind::Ident("x"),
                TokenKind::Punct("=>"),
                TokenKind::Number("1.5m"),
                TokenKind::Punct("+"),
                TokenKind::Number("0x1F"),
                TokenKind::Punct("??"),
                TokenKind::Number("10_000L"),
            ]
        );
        assert_eq!(
            kinds("1.ToString()"),
            vec![
                TokenKind::Number("1"),
                TokenKind::Punct("."),
                TokenKind::Ident("ToString"),
                TokenKind::Punct("("),
                TokenKind::Punct(")"),
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("  int  x").unwrap();
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 7);
        assert_eq!(tokens[1].end(), 8);
    }

    #[test]
    fn test_lexical_errors() {
        let err = tokenize("string s = \"abc\n;").unwrap_err();
        assert_eq!(err.code, codes::NEWLINE_IN_CONSTANT);
        assert_eq!(err.offset, 11);

        let err = tokenize("int x; /* never closed").unwrap_err();
        assert_eq!(err.code, codes::COMMENT_NOT_CLOSED);

        let err = tokenize("var s = @\"open").unwrap_err();
        assert_eq!(err.code, codes::UNTERMINATED_STRING);

        let err = tokenize("char c = '';").unwrap_err();
        assert_eq!(err.code, codes::EMPTY_CHAR);

        let err = tokenize("char c = 'ab';").unwrap_err();
        assert_eq!(err.code, codes::TOO_MANY_CHARS);

        let err = tokenize("int `x").unwrap_err();
        assert_eq!(err.code, codes::UNEXPECTED_CHAR);
        assert_eq!(err.message, "Unexpected character '`'");
    }
}
