//! Keyword and operator lookup tables.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::Kind;

const KEYWORDS: [Kind; 3] = [Kind::Or, Kind::And, Kind::Not];

const OPERATORS: [Kind; 5] = [Kind::Eq, Kind::Lt, Kind::Gt, Kind::Leq, Kind::Geq];

/// Keywords that may join two expressions.
pub const COMBINE_KEYWORDS: [Kind; 2] = [Kind::Or, Kind::And];

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").expect("number pattern is valid")
});

/// Case-insensitive keyword lookup.
pub fn to_keyword(s: &str) -> Option<Kind> {
    KEYWORDS
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
}

/// Exact operator symbol lookup.
pub fn to_operator(s: &str) -> Option<Kind> {
    OPERATORS.into_iter().find(|kind| kind.as_str() == s)
}

pub fn is_keyword(s: &str) -> bool {
    to_keyword(s).is_some()
}

pub fn is_operator(s: &str) -> bool {
    to_operator(s).is_some()
}

/// Operator symbols and parentheses.
pub fn is_special_char(ch: char) -> bool {
    matches!(ch, ':' | '<' | '>' | '(' | ')')
}

/// Whether `ch` must be written with a backslash inside a token of `kind`.
pub fn require_escape(ch: char, kind: Kind) -> bool {
    if ch == '"' || ch == '\\' {
        return true;
    }
    if kind == Kind::String {
        return false;
    }
    is_special_char(ch)
}

/// `[+-]?digits(.digits)?`
pub fn is_number(s: &str) -> bool {
    NUMBER.is_match(s)
}

/// Message listing the keywords accepted between two expressions.
pub fn keywords_expected(got: &str) -> String {
    let expected: Vec<&str> = COMBINE_KEYWORDS.iter().map(|k| k.as_str()).collect();
    format!("expected keyword {}, but got {:?}", expected.join("|"), got)
}

#[test]
fn test_keyword_lookup_ignores_case() {
    for s in ["and", "AND", "aNd", "And"] {
        assert_eq!(to_keyword(s), Some(Kind::And));
    }
    assert_eq!(to_keyword("nOt"), Some(Kind::Not));
    assert_eq!(to_keyword("ors"), None);
}

#[test]
fn test_operator_lookup_is_exact() {
    assert_eq!(to_operator(">="), Some(Kind::Geq));
    assert_eq!(to_operator(":"), Some(Kind::Eq));
    assert_eq!(to_operator("=>"), None);
    assert_eq!(to_operator("="), None);
}

#[test]
fn test_number_shape() {
    for s in ["1", "-1", "+01", "1.5", "-10.01"] {
        assert!(is_number(s), "{s} should be numeric");
    }
    for s in ["", "-", "1.", ".5", "1.2.3", "abc", "\"18\""] {
        assert!(!is_number(s), "{s} should not be numeric");
    }
}

#[test]
fn test_require_escape() {
    assert!(require_escape('"', Kind::String));
    assert!(require_escape('\\', Kind::String));
    assert!(!require_escape(':', Kind::String));
    assert!(require_escape(':', Kind::Ident));
    assert!(require_escape('(', Kind::Ident));
    assert!(!require_escape('a', Kind::Ident));
}
