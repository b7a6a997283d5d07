//! Flattened view over the leaf comparisons of a query.
//!
//! The tree stores the field on the `Binary` that introduced it, so the bare
//! values inside `field: (a OR b)` carry no field of their own. Walking the
//! tree through [`Expr::matches`] resolves that: every leaf reports the field
//! and operator it is compared with, plus whether an odd number of `NOT`s
//! applies to it.

use crate::ast::{Expr, Kind, Literal};

/// One leaf comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    /// Field the value is compared against, `None` for free-text values.
    pub field: Option<&'a str>,
    /// `None` exactly when `field` is `None`.
    pub operator: Option<Kind>,
    pub negated: bool,
    pub value: &'a Literal,
    /// Empty unless the value is a wildcard.
    pub wildcard_offsets: &'a [usize],
}

impl Match<'_> {
    pub fn is_wildcard(&self) -> bool {
        !self.wildcard_offsets.is_empty()
    }
}

#[derive(Clone, Copy)]
struct Scope<'a> {
    field: Option<&'a str>,
    operator: Option<Kind>,
    negated: bool,
}

impl Expr {
    /// Leaf comparisons in source order.
    pub fn matches(&self) -> Vec<Match<'_>> {
        let mut out = Vec::new();
        let root = Scope {
            field: None,
            operator: None,
            negated: false,
        };
        let mut stack = vec![(self, root)];

        while let Some((node, scope)) = stack.pop() {
            match node {
                Expr::Combine(c) => {
                    stack.push((&*c.right, scope));
                    stack.push((&*c.left, scope));
                }
                Expr::Paren(p) => stack.push((&*p.inner, scope)),
                Expr::Binary(b) => {
                    let mut inner = Scope {
                        negated: scope.negated ^ b.negated,
                        ..scope
                    };
                    if b.has_field() {
                        inner.field = Some(b.field.as_str());
                        inner.operator = b.operator;
                    }
                    stack.push((&*b.value, inner));
                }
                Expr::Literal(l) => out.push(Match {
                    field: scope.field,
                    operator: scope.operator,
                    negated: scope.negated,
                    value: l,
                    wildcard_offsets: &[],
                }),
                Expr::Wildcard(w) => out.push(Match {
                    field: scope.field,
                    operator: scope.operator,
                    negated: scope.negated,
                    value: w.literal(),
                    wildcard_offsets: w.wildcard_offsets(),
                }),
            }
        }
        out
    }
}
