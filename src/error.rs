//! Positional diagnostics for failed parses.
//!
//! A [`ParseError`] keeps the query text, the failing offset and the token
//! the parser was looking at, and renders as:
//!
//! ```text
//! line 0:4 expected keyword OR|AND, but got "bar"
//! foo bar
//!     ^^^
//! ```

use std::fmt;

use crate::ast::Kind;
use crate::ast::operators::keywords_expected;
use crate::lexer::LexError;

/// What went wrong, without positional context.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Input is empty or whitespace only
    Empty,

    /// Malformed number, unterminated string or illegal escape
    Lex(LexError),

    /// A keyword, operator or `)` where a field or value was expected
    UnexpectedToken { got: String },

    /// Something other than `AND`/`OR` between two expressions
    ExpectedKeyword { got: String },

    /// Group not closed
    ExpectedRParen { got: String },

    /// Input left over after a complete expression
    ExpectedEof { got: String },

    /// Non-numeric value for `<`, `>`, `<=` or `>=`
    ExpectedNumber { operator: Kind, got: String },

    /// Parentheses nested deeper than the configured limit
    TooDeep { limit: usize },

    /// Boolean chain longer than the configured limit
    TooManyTerms { limit: usize },

    /// Chain links and groups nested deeper than the configured limit
    TooNested { limit: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Empty => write!(f, "expected query string, but got empty string"),
            ErrorKind::Lex(e) => write!(f, "{}", e),
            ErrorKind::UnexpectedToken { got } => {
                write!(f, "unexpected token {:?}, expected field or value", got)
            }
            ErrorKind::ExpectedKeyword { got } => f.write_str(&keywords_expected(got)),
            ErrorKind::ExpectedRParen { got } => {
                write!(f, "expected token Rparen, but got {:?}", got)
            }
            ErrorKind::ExpectedEof { got } => write!(f, "expected Eof, but got {:?}", got),
            ErrorKind::ExpectedNumber { operator, got } => write!(
                f,
                "expected number for operator {:?}, but got {:?}",
                operator.as_str(),
                got
            ),
            ErrorKind::TooDeep { limit } => {
                write!(f, "expression nesting exceeds limit of {}", limit)
            }
            ErrorKind::TooManyTerms { limit } => {
                write!(f, "boolean chain exceeds limit of {} terms", limit)
            }
            ErrorKind::TooNested { limit } => {
                write!(f, "expression tree exceeds nesting limit of {}", limit)
            }
        }
    }
}

/// Input to [`ParseError::new`]: either a bare failure or an error that
/// already carries its context.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCause {
    Raw(ErrorKind),
    Formatted(ParseError),
}

impl From<ErrorKind> for ErrorCause {
    fn from(kind: ErrorKind) -> Self {
        ErrorCause::Raw(kind)
    }
}

impl From<LexError> for ErrorCause {
    fn from(e: LexError) -> Self {
        ErrorCause::Raw(ErrorKind::Lex(e))
    }
}

impl From<ParseError> for ErrorCause {
    fn from(e: ParseError) -> Self {
        ErrorCause::Formatted(e)
    }
}

/// A failed parse with enough context to point at the offending text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    source_text: String,
    last_token: Option<(Kind, String)>,
    pos: usize,
    kind: ErrorKind,
}

impl ParseError {
    /// Attaches context to `cause`. An error that already has context is
    /// returned unchanged, so wrapping twice never nests.
    pub fn new(
        source_text: &str,
        last_token: Option<(Kind, String)>,
        pos: usize,
        cause: impl Into<ErrorCause>,
    ) -> Self {
        match cause.into() {
            ErrorCause::Formatted(e) => e,
            ErrorCause::Raw(kind) => ParseError {
                source_text: source_text.to_string(),
                last_token,
                pos,
                kind,
            },
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Byte offset of the failure.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Kind and source text of the token being looked at, if any.
    pub fn last_token(&self) -> Option<(Kind, &str)> {
        self.last_token.as_ref().map(|(k, s)| (*k, s.as_str()))
    }

    /// Zero-based line and char column of the failure, `None` when the
    /// offset does not fall inside the source.
    pub fn line_col(&self) -> Option<(usize, usize)> {
        let before = self.source_text.get(..self.pos)?;
        let mut line = 0;
        let mut column = 0;
        for ch in before.chars() {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Some((line, column))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((line, column)) = self.line_col() else {
            return write!(f, "{}", self.kind);
        };

        writeln!(f, "line {}:{} {}", line, column, self.kind)?;

        let source_line = self.source_text.split('\n').nth(line).unwrap_or_default();
        writeln!(f, "{}", source_line)?;

        let carets = match &self.last_token {
            Some((_, text)) => text.chars().count().max(1),
            None => 1,
        };
        writeln!(f, "{}{}", " ".repeat(column), "^".repeat(carets))
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Lex(e) => Some(e),
            _ => None,
        }
    }
}
