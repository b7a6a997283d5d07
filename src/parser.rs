//! Recursive descent parser for filter queries.
//!
//! # Grammar
//!
//! ```text
//! expr     := binary (keyword binary)*
//! binary   := NOT? literal (operator literal)?
//! literal  := paren | INT | FLOAT | STRING | IDENT
//! paren    := '(' expr ')'
//! keyword  := AND | OR
//! operator := ':' | '<' | '>' | '<=' | '>='
//! ```
//!
//! `AND` and `OR` bind equally; a chain nests to the right in the order it
//! was written.

use std::mem;

use tracing::{debug, trace};

use crate::{
    ast::{
        Binary, Combine, Expr, Kind, Literal, Paren, Token, Wildcard,
        operators::{COMBINE_KEYWORDS, is_number},
    },
    error::{ErrorKind, ParseError},
    lexer::Lexer,
};

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum parenthesis nesting
    pub max_depth: usize,
    /// Maximum number of terms in one boolean chain
    pub max_terms: usize,
    /// Maximum tree nesting, counting chain links and groups together
    pub max_nesting: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: 128,
            max_terms: 4096,
            max_nesting: 4096,
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }
}

pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer,
    current_token: Token,
    config: ParserConfig,
    depth: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            source,
            lexer: Lexer::new(source),
            current_token: Token::eof(0),
            config: ParserConfig::default(),
            depth: 0,
            nesting: 0,
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse the whole input into one expression.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        trace!(query = self.source, "parsing");

        let result = if self.source.trim().is_empty() {
            Err(ParseError::new(self.source, None, 0, ErrorKind::Empty))
        } else {
            self.parse_query()
        };

        if let Err(e) = &result {
            debug!(pos = e.pos(), error = %e.message(), "parse failed");
        }
        result
    }

    fn parse_query(&mut self) -> Result<Expr, ParseError> {
        self.advance()?;
        let expr = self.parse_expression()?;

        if self.current_token.kind != Kind::Eof {
            return Err(self.error(ErrorKind::ExpectedEof {
                got: self.current_token.describe(),
            }));
        }
        Ok(expr)
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.next_token()?;
        Ok(())
    }

    /// Lexes the token after `current_token`. A lexical error is reported
    /// against `current_token`, the last token emitted before it.
    fn next_token(&mut self) -> Result<Token, ParseError> {
        let e = match self.lexer.next_token() {
            Ok(token) => return Ok(token),
            Err(e) => e,
        };
        let last_token = if self.lexer.last_kind() == Kind::Illegal {
            None
        } else {
            let (start, end) = Self::span(&self.current_token);
            let text = self.source.get(start..end).unwrap_or_default();
            Some((self.current_token.kind, text.to_string()))
        };
        Err(ParseError::new(self.source, last_token, e.pos, e))
    }

    /// Source span of a token; strings are widened to take in their quotes.
    fn span(token: &Token) -> (usize, usize) {
        if token.kind == Kind::String {
            (token.start_pos - 1, token.end_pos + 1)
        } else {
            (token.start_pos, token.end_pos)
        }
    }

    fn error_at(&self, kind: ErrorKind, start: usize, end: usize, token_kind: Kind) -> ParseError {
        let text = self.source.get(start..end).unwrap_or_default().to_string();
        ParseError::new(self.source, Some((token_kind, text)), start, kind)
    }

    /// Error pointing at the current token.
    fn error(&self, kind: ErrorKind) -> ParseError {
        let (start, end) = Self::span(&self.current_token);
        self.error_at(kind, start, end, self.current_token.kind)
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_binary()?;
        self.parse_combine(left)
    }

    /// Folds `left (keyword binary)*` into a right-nested chain. Iterative,
    /// so chain length does not grow the stack.
    fn parse_combine(&mut self, left: Expr) -> Result<Expr, ParseError> {
        let mut rest: Vec<(Kind, Expr)> = vec![];
        let base = self.nesting;

        loop {
            let kind = self.current_token.kind;
            match kind {
                Kind::Eof | Kind::RParen => break,
                k if COMBINE_KEYWORDS.contains(&k) => {
                    if rest.len() + 1 >= self.config.max_terms {
                        return Err(self.error(ErrorKind::TooManyTerms {
                            limit: self.config.max_terms,
                        }));
                    }
                    // the term after the n-th keyword sits under n links
                    self.nesting = base + rest.len() + 1;
                    if self.nesting > self.config.max_nesting {
                        return Err(self.error(ErrorKind::TooNested {
                            limit: self.config.max_nesting,
                        }));
                    }
                    self.advance()?;
                    let right = self.parse_binary()?;
                    rest.push((k, right));
                }
                _ => {
                    return Err(self.error(ErrorKind::ExpectedKeyword {
                        got: self.current_token.describe(),
                    }));
                }
            }
        }

        self.nesting = base;

        let Some((mut keyword, mut right)) = rest.pop() else {
            return Ok(left);
        };
        while let Some((k, expr)) = rest.pop() {
            right = Expr::Combine(Combine::new(expr, keyword, right));
            keyword = k;
        }
        Ok(Expr::Combine(Combine::new(left, keyword, right)))
    }

    fn parse_binary(&mut self) -> Result<Expr, ParseError> {
        let mut not_pos = None;
        if self.current_token.kind == Kind::Not {
            not_pos = Some(self.current_token.start_pos);
            self.advance()?;
        }
        let negated = not_pos.is_some();

        let literal = self.parse_literal()?;
        let start = not_pos.unwrap_or_else(|| literal.pos());

        let operator = self.current_token.kind;
        if !operator.is_operator() || !Self::is_field(&literal) {
            return Ok(Expr::Binary(Binary::bare(start, literal, negated)));
        }

        let field = literal.render();
        self.advance()?;

        let value_kind = self.current_token.kind;
        let value = self.parse_literal()?;

        if operator.is_range() {
            let rendered = value.render();
            if !is_number(&rendered.replace('*', "")) {
                return Err(self.error_at(
                    ErrorKind::ExpectedNumber {
                        operator,
                        got: rendered,
                    },
                    value.pos(),
                    value.end(),
                    value_kind,
                ));
            }
        }

        Ok(Expr::Binary(Binary::new(start, field, operator, value, negated)))
    }

    fn is_field(expr: &Expr) -> bool {
        expr.as_literal().is_some_and(|l| l.kind.is_field())
    }

    fn parse_literal(&mut self) -> Result<Expr, ParseError> {
        match self.current_token.kind {
            Kind::LParen => self.parse_paren(),
            Kind::Int | Kind::Float | Kind::String | Kind::Ident => {
                let next = self.next_token()?;
                let token = mem::replace(&mut self.current_token, next);

                let (start, end) = Self::span(&token);
                let literal =
                    Literal::new(start, end, token.kind, token.text, token.escape_offsets);
                Ok(Self::parse_wildcard(literal))
            }
            _ => Err(self.error(ErrorKind::UnexpectedToken {
                got: self.current_token.describe(),
            })),
        }
    }

    fn parse_paren(&mut self) -> Result<Expr, ParseError> {
        let l_pos = self.current_token.start_pos;

        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(self.error(ErrorKind::TooDeep {
                limit: self.config.max_depth,
            }));
        }
        self.nesting += 1;
        if self.nesting > self.config.max_nesting {
            return Err(self.error(ErrorKind::TooNested {
                limit: self.config.max_nesting,
            }));
        }

        self.advance()?; // consume '('
        let inner = self.parse_expression()?;

        if self.current_token.kind != Kind::RParen {
            return Err(self.error(ErrorKind::ExpectedRParen {
                got: self.current_token.describe(),
            }));
        }
        let r_pos = self.current_token.end_pos;
        self.advance()?;
        self.depth -= 1;
        self.nesting -= 1;

        Ok(Expr::Paren(Paren::new(l_pos, r_pos, inner)))
    }

    fn parse_wildcard(literal: Literal) -> Expr {
        if !matches!(literal.kind, Kind::Ident | Kind::String) {
            return Expr::Literal(literal);
        }
        let offsets = literal.wildcard_offsets();
        if offsets.is_empty() {
            Expr::Literal(literal)
        } else {
            Expr::Wildcard(Wildcard::new(literal, offsets))
        }
    }
}
