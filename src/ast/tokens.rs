use std::fmt;

/// Kind of a lexical token.
///
/// The declaration order is significant: keyword and operator kinds are
/// contiguous, so the range predicates below stay in sync with the lookup
/// tables in [`operators`](super::operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Not a valid token
    Illegal,
    /// End of input
    Eof,

    // Literals
    /// Integer, optionally signed
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -10
    /// ```
    Int,

    /// Floating point number, optionally signed
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -0.5
    /// ```
    Float,

    /// Double quoted string
    ///
    /// # Examples
    /// ```text
    /// "hello world"
    /// "say \"hi\""
    /// ```
    String,

    /// Bare word: a field name or an unquoted value
    ///
    /// # Examples
    /// ```text
    /// status
    /// a.b.c
    /// f*o
    /// ```
    Ident,

    // Keywords (case-insensitive)
    /// `OR`
    Or,
    /// `AND`
    And,
    /// `NOT`
    Not,

    // Operators
    /// `:`
    Eq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Leq,
    /// `>=`
    Geq,

    // Structural
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `*`
    Wildcard,
}

impl Kind {
    pub fn is_keyword(self) -> bool {
        self >= Kind::Or && self <= Kind::Not
    }

    pub fn is_operator(self) -> bool {
        self >= Kind::Eq && self <= Kind::Geq
    }

    /// Range comparisons: `<`, `>`, `<=`, `>=`.
    pub fn is_range(self) -> bool {
        self >= Kind::Lt && self <= Kind::Geq
    }

    /// Only identifiers may name a field.
    pub fn is_field(self) -> bool {
        self == Kind::Ident
    }

    pub fn is_value(self) -> bool {
        matches!(self, Kind::Ident | Kind::Int | Kind::Float | Kind::String)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Illegal => "Illegal",
            Kind::Eof => "Eof",
            Kind::Int => "Int",
            Kind::Float => "Float",
            Kind::String => "String",
            Kind::Ident => "Ident",
            Kind::Or => "OR",
            Kind::And => "AND",
            Kind::Not => "NOT",
            Kind::Eq => ":",
            Kind::Lt => "<",
            Kind::Gt => ">",
            Kind::Leq => "<=",
            Kind::Geq => ">=",
            Kind::LParen => "(",
            Kind::RParen => ")",
            Kind::Wildcard => "*",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token produced by the lexer.
///
/// `text` holds the de-escaped value. For strings, `start_pos..end_pos`
/// covers the content between the quotes, not the quotes themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub start_pos: usize,
    pub end_pos: usize,
    pub kind: Kind,
    pub text: String,
    /// Char indexes into `text` where a backslash was removed.
    pub escape_offsets: Vec<usize>,
}

impl Token {
    pub fn new(kind: Kind, text: impl Into<String>, start_pos: usize, end_pos: usize) -> Self {
        Token {
            start_pos,
            end_pos,
            kind,
            text: text.into(),
            escape_offsets: Vec::new(),
        }
    }

    pub fn eof(pos: usize) -> Self {
        Token::new(Kind::Eof, "", pos, pos)
    }

    /// How the token is named in diagnostics: its text for values, its
    /// symbol otherwise.
    pub fn describe(&self) -> String {
        if self.kind.is_value() || self.kind == Kind::Illegal {
            self.text.clone()
        } else {
            self.kind.to_string()
        }
    }
}
