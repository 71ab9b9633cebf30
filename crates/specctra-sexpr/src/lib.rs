//! A small S-expression reader for the Specctra DSN/SES exchange format.
//!
//! The reader knows nothing about DSN record kinds. It turns text into a tree of
//! [`Sexpr`] primitives (symbols, quoted strings, numbers and lists), keeping the
//! source span of every node. The [`formatter`] module holds the text helpers used
//! to write primitives and scalars back out.
//!
//! DSN identifiers routinely contain punctuation such as `:`, `[`, `]`, `.` or
//! `-`, so only whitespace and parentheses delimit a bare symbol.

pub mod formatter;

use std::fmt;

use thiserror::Error;

/// Find a direct child list `(name ...)` within a list of [`Sexpr`] nodes.
pub fn find_child_list<'a>(items: &'a [Sexpr], name: &str) -> Option<&'a [Sexpr]> {
    items
        .iter()
        .filter_map(Sexpr::as_list)
        .find(|list| list.first().and_then(Sexpr::as_sym) == Some(name))
}

/// Find all direct child lists `(name ...)` within a list of [`Sexpr`] nodes.
pub fn find_all_child_lists<'a>(items: &'a [Sexpr], name: &str) -> Vec<&'a [Sexpr]> {
    items
        .iter()
        .filter_map(Sexpr::as_list)
        .filter(|list| list.first().and_then(Sexpr::as_sym) == Some(name))
        .collect()
}

/// Byte span in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create an empty/synthetic span (for constructed nodes)
    pub fn synthetic() -> Self {
        Self { start: 0, end: 0 }
    }
}

/// The kind of S-expression value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SexprKind {
    /// A symbol - unquoted identifier
    Symbol(String),
    /// A string - quoted text
    String(String),
    /// An integer value
    Int(i64),
    /// A floating-point value
    F64(f64),
    /// A list of S-expressions
    List(Vec<Sexpr>),
}

/// An S-expression value with source span
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sexpr {
    pub kind: SexprKind,
    pub span: Span,
}

impl PartialEq for Sexpr {
    fn eq(&self, other: &Self) -> bool {
        // Spans are positional metadata, not part of the value
        self.kind == other.kind
    }
}

impl Sexpr {
    pub fn with_span(kind: SexprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create a symbol (unquoted atom) with synthetic span
    pub fn symbol(s: impl Into<String>) -> Self {
        Self::with_span(SexprKind::Symbol(s.into()), Span::synthetic())
    }

    /// Create a string (quoted atom) with synthetic span
    pub fn string(s: impl Into<String>) -> Self {
        Self::with_span(SexprKind::String(s.into()), Span::synthetic())
    }

    pub fn int(n: i64) -> Self {
        Self::with_span(SexprKind::Int(n), Span::synthetic())
    }

    pub fn float(f: f64) -> Self {
        Self::with_span(SexprKind::F64(f), Span::synthetic())
    }

    pub fn list(items: Vec<Sexpr>) -> Self {
        Self::with_span(SexprKind::List(items), Span::synthetic())
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, SexprKind::List(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, SexprKind::Int(_) | SexprKind::F64(_))
    }

    /// Get the text of a symbol or a quoted string.
    ///
    /// DSN writers quote identifiers inconsistently, so most readers treat both
    /// forms as the same "string primitive".
    pub fn as_atom(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::Symbol(s) | SexprKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the symbol name if this is a symbol
    pub fn as_sym(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Get the string content if this is a string literal
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match &self.kind {
            SexprKind::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match &self.kind {
            SexprKind::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Coerce a number atom into f64.
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            SexprKind::Int(n) => Some(*n as f64),
            SexprKind::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match &self.kind {
            SexprKind::List(items) => Some(items),
            _ => None,
        }
    }

    /// The head symbol of a list, `pcb` for `(pcb ...)`.
    pub fn head(&self) -> Option<&str> {
        self.as_list()?.first()?.as_sym()
    }

    /// Find a child list with the given name (first element)
    pub fn find_list(&self, name: &str) -> Option<&[Sexpr]> {
        find_child_list(self.as_list()?, name)
    }

    /// Find all child lists with the given name
    pub fn find_all_lists(&self, name: &str) -> Vec<&[Sexpr]> {
        self.as_list()
            .map(|items| find_all_child_lists(items, name))
            .unwrap_or_default()
    }
}

impl From<&str> for Sexpr {
    fn from(s: &str) -> Self {
        Self::symbol(s)
    }
}

/// Line/column position of a byte offset, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    fn locate(input: &str, offset: usize) -> Self {
        let before = &input[..offset.min(input.len())];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
            + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while reading S-expression text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unclosed list opened at {start}")]
    UnclosedList { start: Location },

    #[error("unterminated string starting at {start}")]
    UnterminatedString { start: Location },

    #[error("unexpected ')' at {at}")]
    UnexpectedCloseParen { at: Location },
}

/// Reader for S-expressions
pub struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            chars: input.char_indices().peekable(),
            current_pos: 0,
        }
    }

    /// Read the next S-expression
    pub fn parse(&mut self) -> Result<Sexpr, ParseError> {
        self.skip_whitespace();
        match self.peek_char() {
            None => Err(ParseError::UnexpectedEof),
            Some('(') => self.parse_list(),
            Some(')') => Err(ParseError::UnexpectedCloseParen {
                at: self.location(self.current_pos),
            }),
            Some(_) => self.parse_atom(),
        }
    }

    /// Read every top-level S-expression in the input
    pub fn parse_all(&mut self) -> Result<Vec<Sexpr>, ParseError> {
        let mut results = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            results.push(self.parse()?);
        }

        Ok(results)
    }

    fn parse_list(&mut self) -> Result<Sexpr, ParseError> {
        let start_pos = self.current_pos;
        self.advance(); // '('
        let mut items: Vec<Sexpr> = Vec::new();

        loop {
            self.skip_whitespace();

            match self.peek_char() {
                None => {
                    return Err(ParseError::UnclosedList {
                        start: self.location(start_pos),
                    });
                }
                Some(')') => {
                    self.advance();
                    break;
                }
                _ => {}
            }

            let after_quote_directive = matches!(
                items.last().and_then(Sexpr::as_sym),
                Some("string_quote" | "quote_char")
            );
            if after_quote_directive && self.at_bare_quote() {
                let start = self.current_pos;
                self.advance();
                items.push(Sexpr::with_span(
                    SexprKind::Symbol("\"".to_string()),
                    Span::new(start, self.current_pos),
                ));
                continue;
            }

            items.push(self.parse()?);

            if items.len() % 1000 == 0 {
                log::trace!(
                    "Parsed {} items in list at position {start_pos}",
                    items.len()
                );
            }
        }

        Ok(Sexpr::with_span(
            SexprKind::List(items),
            Span::new(start_pos, self.current_pos),
        ))
    }

    /// `(string_quote ")` and `(quote_char ")` declare the quote character with a lone `"`.
    fn at_bare_quote(&self) -> bool {
        let rest = &self.input[self.current_pos..];
        let mut chars = rest.chars();
        chars.next() == Some('"')
            && chars
                .next()
                .is_none_or(|ch| ch.is_whitespace() || ch == ')')
    }

    fn parse_atom(&mut self) -> Result<Sexpr, ParseError> {
        if self.peek_char() == Some('"') {
            return self.parse_string();
        }

        let start = self.current_pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == '(' || ch == ')' {
                break;
            }
            self.advance();
        }

        let end = self.current_pos;
        let lexeme = &self.input[start..end];
        let span = Span::new(start, end);

        Ok(Sexpr::with_span(classify_atom(lexeme), span))
    }

    fn parse_string(&mut self) -> Result<Sexpr, ParseError> {
        let start_pos = self.current_pos;
        self.advance(); // opening quote
        let mut result = String::new();

        loop {
            match self.peek_char() {
                None => {
                    return Err(ParseError::UnterminatedString {
                        start: self.location(start_pos),
                    });
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some(ch) => ch,
                        None => {
                            return Err(ParseError::UnterminatedString {
                                start: self.location(start_pos),
                            });
                        }
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(ch) => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Ok(Sexpr::with_span(
            SexprKind::String(result),
            Span::new(start_pos, self.current_pos),
        ))
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn advance(&mut self) {
        if let Some((pos, ch)) = self.chars.next() {
            self.current_pos = pos + ch.len_utf8();
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn location(&self, offset: usize) -> Location {
        Location::locate(self.input, offset)
    }
}

/// Decide whether a bare token is a number or a symbol.
fn classify_atom(lexeme: &str) -> SexprKind {
    if is_numeric_lexeme(lexeme) {
        let integral = !lexeme.contains(['.', 'e', 'E']);
        if integral {
            if let Ok(n) = lexeme.parse::<i64>() {
                return SexprKind::Int(n);
            }
        }
        // Out-of-range integers fall through to f64
        if let Ok(f) = lexeme.parse::<f64>() {
            return SexprKind::F64(f);
        }
    }
    SexprKind::Symbol(lexeme.to_string())
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
///
/// Stricter than `str::parse::<f64>`, which would also accept `inf` or `NaN`.
pub fn is_numeric_lexeme(lexeme: &str) -> bool {
    let bytes = lexeme.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Read the first S-expression in `input`
pub fn parse(input: &str) -> Result<Sexpr, ParseError> {
    log::trace!("Parsing S-expression from {} bytes of input", input.len());
    Parser::new(input).parse()
}

/// Read every top-level S-expression in `input`
pub fn read(input: &str) -> Result<Vec<Sexpr>, ParseError> {
    log::trace!(
        "Reading S-expressions from {} bytes of input",
        input.len()
    );
    let result = Parser::new(input).parse_all();
    match &result {
        Ok(exprs) => log::trace!("Read {} top-level S-expressions", exprs.len()),
        Err(e) => log::trace!("Failed to read S-expressions: {e}"),
    }
    result
}

impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        formatter::write_indented(self, 0, &mut out);
        f.write_str(&out)
    }
}
