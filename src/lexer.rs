use std::fmt;

use tracing::trace;

use crate::ast::operators::{is_keyword, is_operator, require_escape, to_keyword, to_operator};
use crate::ast::{Kind, Token};

/// A lexical error and the byte offset it was detected at.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub pos: usize,
}

impl LexError {
    fn new(message: impl Into<String>, pos: usize) -> Self {
        LexError {
            message: message.into(),
            pos,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LexError {}

/// Pull-based scanner over a query string.
///
/// Works on chars while reporting byte offsets. The kind of the last emitted
/// token is kept: right after an operator, a bare word is always a value and
/// is never re-tagged as a keyword, so `status: and` compares against "and".
pub struct Lexer {
    input: Vec<char>,
    /// Byte offset of every char, plus the input length.
    offsets: Vec<usize>,
    position: usize,
    last_kind: Kind,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut offsets = Vec::with_capacity(input.len() + 1);
        for (offset, ch) in input.char_indices() {
            chars.push(ch);
            offsets.push(offset);
        }
        offsets.push(input.len());

        Lexer {
            input: chars,
            offsets,
            position: 0,
            last_kind: Kind::Illegal,
        }
    }

    /// Kind of the most recently emitted token, `Illegal` before the first.
    pub fn last_kind(&self) -> Kind {
        self.last_kind
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.byte_at(self.position)
    }

    fn byte_at(&self, index: usize) -> usize {
        self.offsets[index.min(self.input.len())]
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.input.get(index).copied()
    }

    fn current_char(&self) -> Option<char> {
        self.char_at(self.position)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    fn read_operator(&mut self, start: usize) -> Token {
        let len = match (self.char_at(start), self.char_at(start + 1)) {
            (Some('<' | '>'), Some('=')) => 2,
            _ => 1,
        };
        let text: String = self.input[start..start + len].iter().collect();
        let kind = to_operator(&text).unwrap_or(Kind::Illegal);

        self.position = start + len;
        Token::new(kind, text, self.byte_at(start), self.byte_at(self.position))
    }

    fn read_paren(&mut self, start: usize, kind: Kind) -> Token {
        self.position = start + 1;
        Token::new(kind, kind.as_str(), self.byte_at(start), self.byte_at(self.position))
    }

    /// Errors are reported at `start`, the beginning of the number.
    fn expect_digit(&self, start: usize, index: usize) -> Result<(), LexError> {
        match self.char_at(index) {
            Some(ch) if ch.is_ascii_digit() => Ok(()),
            Some(ch) => Err(LexError::new(
                format!("expected digit, but got {:?}", ch.to_string()),
                self.byte_at(start),
            )),
            None => Err(LexError::new("expected digit, but got Eof", self.byte_at(start))),
        }
    }

    fn skip_digits(&self, mut index: usize) -> usize {
        while self.char_at(index).is_some_and(|c| c.is_ascii_digit()) {
            index += 1;
        }
        index
    }

    fn read_number(&mut self, start: usize, field_context: bool) -> Result<Token, LexError> {
        let mut i = start;
        if matches!(self.char_at(i), Some('+' | '-')) {
            self.expect_digit(start, i + 1)?;
            i += 1;
        }

        i = self.skip_digits(i);
        let mut kind = Kind::Int;

        if self.char_at(i) == Some('.') {
            // `5.*` reads as a wildcard word, not a broken float
            if self.char_at(i + 1) == Some('*') {
                return self.read_identifier(start, field_context);
            }
            self.expect_digit(start, i + 1)?;
            i = self.skip_digits(i + 1);
            kind = Kind::Float;
        }

        if self.char_at(i) == Some('*') {
            return self.read_identifier(start, field_context);
        }

        let text: String = self.input[start..i].iter().collect();
        self.position = i;
        Ok(Token::new(kind, text, self.byte_at(start), self.byte_at(i)))
    }

    fn read_string(&mut self, start: usize) -> Result<Token, LexError> {
        let mut value = String::new();
        let mut escape_offsets = Vec::new();
        let mut count = 0;
        let mut i = start + 1; // opening quote

        loop {
            match self.char_at(i) {
                None => {
                    return Err(LexError::new(
                        "expected double quote closed",
                        self.byte_at(start),
                    ));
                }
                Some('"') => break,
                Some('\\') => match self.char_at(i + 1) {
                    Some(ch @ ('"' | '\\' | '*')) => {
                        escape_offsets.push(count);
                        value.push(ch);
                        count += 1;
                        i += 2;
                    }
                    _ => return Err(LexError::new("unexpected escapes", self.byte_at(i))),
                },
                Some(ch) => {
                    value.push(ch);
                    count += 1;
                    i += 1;
                }
            }
        }

        self.position = i + 1;
        let mut token = Token::new(Kind::String, value, self.byte_at(start + 1), self.byte_at(i));
        token.escape_offsets = escape_offsets;
        Ok(token)
    }

    /// The run of chars starting at `index`, extended up to the next
    /// unescaped boundary.
    fn collect_word(&self, index: usize) -> String {
        let mut word = String::new();
        let Some(first) = self.char_at(index) else {
            return word;
        };
        word.push(first);

        let mut j = index;
        while let Some(next) = self.char_at(j + 1) {
            let current = self.input[j];
            if current != '\\' && (next.is_whitespace() || next == ')' || next == ':') {
                break;
            }
            word.push(next);
            j += 1;
        }
        word
    }

    /// Whether the char at `index`, which follows a backslash in a bare word,
    /// may be escaped.
    fn escapable(&self, index: usize) -> bool {
        let Some(ch) = self.char_at(index) else {
            return false;
        };
        if ch == '*' || require_escape(ch, Kind::Ident) {
            return true;
        }
        let word = self.collect_word(index);
        is_keyword(&word) || is_operator(&word)
    }

    fn read_identifier(&mut self, start: usize, field_context: bool) -> Result<Token, LexError> {
        let mut value = String::new();
        let mut escape_offsets = Vec::new();
        let mut count = 0;
        let mut escaped_any = false;
        let mut i = start;

        while let Some(ch) = self.char_at(i) {
            if ch.is_whitespace() || ch == ')' || ch == ':' {
                break;
            }
            if ch == '\\' {
                if !self.escapable(i + 1) {
                    return Err(LexError::new("unexpected escapes", self.byte_at(i)));
                }
                escaped_any = true;
                escape_offsets.push(count);
                value.push(self.input[i + 1]);
                count += 1;
                i += 2;
                continue;
            }
            if require_escape(ch, Kind::Ident) {
                break;
            }
            value.push(ch);
            count += 1;
            i += 1;
        }

        if i == start {
            let ch = self.char_at(start).map(String::from).unwrap_or_default();
            return Err(LexError::new(
                format!("unexpected character {:?}", ch),
                self.byte_at(start),
            ));
        }

        let mut kind = Kind::Ident;
        if !escaped_any && !field_context {
            if let Some(keyword) = to_keyword(&value) {
                kind = keyword;
            } else if let Some(operator) = to_operator(&value) {
                kind = operator;
            }
        }

        self.position = i;
        let mut token = Token::new(kind, value, self.byte_at(start), self.byte_at(i));
        token.escape_offsets = escape_offsets;
        Ok(token)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start = self.position;
        let field_context = self.last_kind.is_operator();

        let token = match self.current_char() {
            None => Token::eof(self.byte_at(start)),
            Some(':' | '<' | '>') => self.read_operator(start),
            Some('(') => self.read_paren(start, Kind::LParen),
            Some(')') => self.read_paren(start, Kind::RParen),
            Some(ch) if ch == '+' || ch == '-' || ch.is_ascii_digit() => {
                self.read_number(start, field_context)?
            }
            Some('"') => self.read_string(start)?,
            Some(_) => self.read_identifier(start, field_context)?,
        };

        trace!(kind = %token.kind, start = token.start_pos, end = token.end_pos, "token");
        self.last_kind = token.kind;
        Ok(token)
    }

    /// Every token up to, not including, `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == Kind::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and OR Not");
    assert_eq!(lexer.next_token().unwrap().kind, Kind::And);
    assert_eq!(lexer.next_token().unwrap().kind, Kind::Or);
    assert_eq!(lexer.next_token().unwrap().kind, Kind::Not);
    assert_eq!(lexer.next_token().unwrap().kind, Kind::Eof);
}

#[test]
fn test_field_comparison() {
    let mut lexer = Lexer::new("age>=18");
    let kinds: Vec<Kind> = lexer.tokenize().unwrap().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![Kind::Ident, Kind::Geq, Kind::Int]);
}

#[test]
fn test_value_after_operator_is_not_keyword() {
    let mut lexer = Lexer::new("f: AND AND");
    let kinds: Vec<Kind> = lexer.tokenize().unwrap().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![Kind::Ident, Kind::Eq, Kind::Ident, Kind::And]);
}

#[test]
fn test_byte_offsets_with_multibyte_text() {
    let mut lexer = Lexer::new("név: \"é\"");
    let field = lexer.next_token().unwrap();
    assert_eq!((field.start_pos, field.end_pos), (0, 4));
    lexer.next_token().unwrap();
    let value = lexer.next_token().unwrap();
    assert_eq!(value.text, "é");
    assert_eq!((value.start_pos, value.end_pos), (7, 9));
}
