use std::{fmt, mem};

use rust_decimal::Decimal;

use crate::ast::Kind;

/// Abstract Syntax Tree node representing a parsed filter query.
///
/// Every node knows the byte span it was parsed from (`pos()..end()`) and
/// renders back into query text through [`Display`](fmt::Display). The
/// rendering is canonical: re-parsing it yields a tree that renders the same.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A single comparison or a bare value, optionally negated
    ///
    /// # Examples
    /// ```text
    /// status: active
    /// age >= 18
    /// NOT "error"
    /// ```
    Binary(Binary),

    /// Two expressions joined by `AND` or `OR`
    ///
    /// # Example
    /// ```text
    /// a AND b OR c
    /// ```
    Combine(Combine),

    /// A parenthesized group
    ///
    /// # Example
    /// ```text
    /// (a OR b)
    /// ```
    Paren(Paren),

    /// Integer, float, string or identifier value
    Literal(Literal),

    /// Identifier or string value containing unescaped `*`
    ///
    /// # Examples
    /// ```text
    /// f*o
    /// "*error*"
    /// ```
    Wildcard(Wildcard),
}

impl Expr {
    /// Byte offset where this expression starts in the source.
    pub fn pos(&self) -> usize {
        let mut node = self;
        loop {
            match node {
                Expr::Combine(c) => node = &*c.left,
                Expr::Binary(b) => return b.start,
                Expr::Paren(p) => return p.l_pos,
                Expr::Literal(l) => return l.start,
                Expr::Wildcard(w) => return w.pos(),
            }
        }
    }

    /// Byte offset just past the end of this expression in the source.
    pub fn end(&self) -> usize {
        let mut node = self;
        loop {
            match node {
                Expr::Combine(c) => node = &*c.right,
                Expr::Binary(b) => node = &*b.value,
                Expr::Paren(p) => return p.r_pos,
                Expr::Literal(l) => return l.end,
                Expr::Wildcard(w) => return w.end(),
            }
        }
    }

    /// Canonical query text for this expression.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Nesting depth of the tree; a lone literal has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            match node {
                Expr::Combine(c) => {
                    stack.push((&*c.left, depth + 1));
                    stack.push((&*c.right, depth + 1));
                }
                Expr::Binary(b) => stack.push((&*b.value, depth + 1)),
                Expr::Paren(p) => stack.push((&*p.inner, depth + 1)),
                Expr::Literal(_) | Expr::Wildcard(_) => {}
            }
        }
        deepest
    }

    /// The literal behind a `Literal` or `Wildcard` node.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Literal(l) => Some(l),
            Expr::Wildcard(w) => Some(w.literal()),
            _ => None,
        }
    }
}

impl Expr {
    /// Moves every non-leaf child of this node into `out`, leaving empty
    /// leaves behind.
    fn take_children(&mut self, out: &mut Vec<Box<Expr>>) {
        let mut take = |slot: &mut Box<Expr>| {
            if matches!(**slot, Expr::Combine(_) | Expr::Binary(_) | Expr::Paren(_)) {
                out.push(mem::replace(slot, Box::new(Expr::empty())));
            }
        };
        match self {
            Expr::Combine(c) => {
                take(&mut c.left);
                take(&mut c.right);
            }
            Expr::Binary(b) => take(&mut b.value),
            Expr::Paren(p) => take(&mut p.inner),
            Expr::Literal(_) | Expr::Wildcard(_) => {}
        }
    }

    fn empty() -> Expr {
        Expr::Literal(Literal::new(0, 0, Kind::Illegal, String::new(), Vec::new()))
    }
}

// Iterative teardown: tree depth is not bounded by the call stack.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.take_children(&mut stack);
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary(b) => fmt::Display::fmt(b, f),
            Expr::Combine(c) => fmt::Display::fmt(c, f),
            Expr::Paren(p) => fmt::Display::fmt(p, f),
            Expr::Literal(l) => fmt::Display::fmt(l, f),
            Expr::Wildcard(w) => fmt::Display::fmt(w, f),
        }
    }
}

/// A scalar value as written in the query.
///
/// `value` is de-escaped; `escape_offsets` remembers where the backslashes
/// were so the original spelling can be reproduced. The span of a quoted
/// literal includes both quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub start: usize,
    pub end: usize,
    pub kind: Kind,
    pub value: String,
    pub escape_offsets: Vec<usize>,
    pub quoted: bool,
}

impl Literal {
    pub fn new(
        start: usize,
        end: usize,
        kind: Kind,
        value: impl Into<String>,
        escape_offsets: Vec<usize>,
    ) -> Self {
        Literal {
            start,
            end,
            kind,
            value: value.into(),
            escape_offsets,
            quoted: kind == Kind::String,
        }
    }

    pub fn pos(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The value with its backslashes put back, without quotes.
    pub fn raw(&self) -> String {
        let mut out = String::with_capacity(self.value.len() + self.escape_offsets.len());
        let mut offsets = self.escape_offsets.iter().peekable();
        for (i, ch) in self.value.chars().enumerate() {
            while offsets.next_if(|&&o| o == i).is_some() {
                out.push('\\');
            }
            out.push(ch);
        }
        out
    }

    /// Char indexes of unescaped `*` within the rendered text.
    pub fn wildcard_offsets(&self) -> Vec<usize> {
        let lead = usize::from(self.quoted);
        let mut offsets = Vec::new();
        let mut escapes_before = 0;
        let mut pending = self.escape_offsets.iter().peekable();

        for (i, ch) in self.value.chars().enumerate() {
            let mut escaped = false;
            while pending.next_if(|&&o| o == i).is_some() {
                escapes_before += 1;
                escaped = true;
            }
            if ch == '*' && !escaped {
                offsets.push(i + escapes_before + lead);
            }
        }
        offsets
    }

    /// Exact numeric value of an `Int` or `Float` literal.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self.kind {
            Kind::Int | Kind::Float => self.value.trim_start_matches('+').parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.raw())
        } else {
            f.write_str(&self.raw())
        }
    }
}

/// A literal that carries wildcards.
///
/// Wraps the literal rather than copying it; accessors delegate to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Wildcard {
    literal: Literal,
    wildcard_offsets: Vec<usize>,
}

impl Wildcard {
    pub fn new(literal: Literal, wildcard_offsets: Vec<usize>) -> Self {
        Wildcard {
            literal,
            wildcard_offsets,
        }
    }

    pub fn pos(&self) -> usize {
        self.literal.start
    }

    pub fn end(&self) -> usize {
        self.literal.end
    }

    pub fn kind(&self) -> Kind {
        self.literal.kind
    }

    pub fn value(&self) -> &str {
        &self.literal.value
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    pub fn into_literal(self) -> Literal {
        self.literal
    }

    pub fn wildcard_offsets(&self) -> &[usize] {
        &self.wildcard_offsets
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.literal, f)
    }
}

/// `[NOT] [field operator] value`
///
/// `field` is empty and `operator` is `None` when the expression is a bare
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub start: usize,
    pub field: String,
    pub operator: Option<Kind>,
    pub value: Box<Expr>,
    pub negated: bool,
}

impl Binary {
    pub fn new(
        start: usize,
        field: impl Into<String>,
        operator: Kind,
        value: Expr,
        negated: bool,
    ) -> Self {
        Binary {
            start,
            field: field.into(),
            operator: Some(operator),
            value: Box::new(value),
            negated,
        }
    }

    pub fn bare(start: usize, value: Expr, negated: bool) -> Self {
        Binary {
            start,
            field: String::new(),
            operator: None,
            value: Box::new(value),
            negated,
        }
    }

    pub fn has_field(&self) -> bool {
        !self.field.is_empty()
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("NOT ")?;
        }
        if let Some(op) = self.operator.filter(|_| self.has_field()) {
            f.write_str(&self.field)?;
            if op != Kind::Eq {
                f.write_str(" ")?;
            }
            write!(f, "{} ", op)?;
        }
        fmt::Display::fmt(&self.value, f)
    }
}

/// `left keyword right`, where `right` may itself be a `Combine`.
#[derive(Debug, Clone, PartialEq)]
pub struct Combine {
    pub left: Box<Expr>,
    pub keyword: Kind,
    pub right: Box<Expr>,
}

impl Combine {
    pub fn new(left: Expr, keyword: Kind, right: Expr) -> Self {
        Combine {
            left: Box::new(left),
            keyword,
            right: Box::new(right),
        }
    }
}

impl fmt::Display for Combine {
    // Walks the right spine in a loop; chains can be thousands of terms long.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node = self;
        loop {
            write!(f, "{} {} ", node.left, node.keyword)?;
            match node.right.as_ref() {
                Expr::Combine(next) => node = next,
                last => return fmt::Display::fmt(last, f),
            }
        }
    }
}

/// A user-written group. `l_pos` is the `(`, `r_pos` is just past the `)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paren {
    pub l_pos: usize,
    pub r_pos: usize,
    pub inner: Box<Expr>,
}

impl Paren {
    pub fn new(l_pos: usize, r_pos: usize, inner: Expr) -> Self {
        Paren {
            l_pos,
            r_pos,
            inner: Box::new(inner),
        }
    }
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.inner)
    }
}
