//! # KQL Filter Queries - Abstract Syntax Tree
//!
//! This module defines the token model and the Abstract Syntax Tree (AST) for
//! Kibana-style filter queries: field/value comparisons joined by boolean
//! keywords, with optional grouping.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Token kinds and the token produced by the lexer
//! - **[operators]** - Keyword/operator lookup tables and escape rules
//! - **[expressions]** - Expression nodes (binary, combine, paren, literal, wildcard)
//! - **[matches]** - Flattened leaf comparisons with inherited fields
//!
//! ## Quick Start
//!
//! ```text
//! status: "active" AND NOT level: (error OR warn) AND age >= 18
//! ```
//!
//! ## Core Concepts
//!
//! ### Comparisons
//!
//! A comparison is `field operator value`, where the operator is one of
//! `:`, `<`, `>`, `<=`, `>=`. A value on its own (no field) is a free-text
//! match. Only bare identifiers can be fields: `123 > 1` is rejected.
//!
//! ### Boolean Chains
//!
//! `AND` and `OR` have the **same** precedence and chain strictly left to
//! right, nesting to the right:
//!
//! ```text
//! a AND b OR c   =>   Combine(a, AND, Combine(b, OR, c))
//! ```
//!
//! Use parentheses to group differently. Keywords are case-insensitive.
//!
//! ### Escapes
//!
//! A backslash makes a special character literal. Inside quotes only `\"`,
//! `\\` and `\*` are allowed. In bare words any operator, parenthesis,
//! quote, `*`, or the first letter of a keyword may be escaped: `\AND` is the
//! word "AND", not the keyword.
//!
//! ### Wildcards
//!
//! An unescaped `*` inside an identifier or string turns the value into a
//! [`Wildcard`] node that records where each `*` sits in the rendered text.
//!
//! ### Positions
//!
//! `pos()` and `end()` are byte offsets into the original query, so
//! `&query[expr.pos()..expr.end()]` is the source text of `expr`.
pub mod expressions;
pub mod matches;
pub mod operators;
pub mod tokens;

pub use expressions::{Binary, Combine, Expr, Literal, Paren, Wildcard};
pub use matches::Match;
pub use tokens::{Kind, Token};
