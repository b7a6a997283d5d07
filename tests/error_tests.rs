// tests/error_tests.rs

use std::error::Error;

use kql_parser::ast::Kind;
use kql_parser::error::{ErrorKind, ParseError};
use kql_parser::{ParserConfig, parse, parse_with};

fn diagnostic(input: &str) -> String {
    parse(input).unwrap_err().to_string()
}

// ============================================================================
// Diagnostic layout
// ============================================================================

#[test]
fn test_missing_keyword_diagnostic() {
    assert_eq!(
        diagnostic("foo bar"),
        "line 0:4 expected keyword OR|AND, but got \"bar\"\nfoo bar\n    ^^^\n"
    );
}

#[test]
fn test_keyword_alone_diagnostic() {
    assert_eq!(
        diagnostic("AND"),
        "line 0:0 unexpected token \"AND\", expected field or value\nAND\n^^^\n"
    );
}

#[test]
fn test_unclosed_group_diagnostic() {
    assert_eq!(
        diagnostic("(a"),
        "line 0:2 expected token Rparen, but got \"Eof\"\n(a\n  ^\n"
    );
}

#[test]
fn test_trailing_input_diagnostic() {
    assert_eq!(
        diagnostic("a)"),
        "line 0:1 expected Eof, but got \")\"\na)\n ^\n"
    );
}

#[test]
fn test_range_guard_diagnostic() {
    assert_eq!(
        diagnostic("age >= abc"),
        "line 0:7 expected number for operator \">=\", but got \"abc\"\nage >= abc\n       ^^^\n"
    );
}

#[test]
fn test_quoted_token_carets_cover_quotes() {
    assert_eq!(
        diagnostic("a \"bc\""),
        "line 0:2 expected keyword OR|AND, but got \"bc\"\na \"bc\"\n  ^^^^\n"
    );
}

#[test]
fn test_empty_diagnostic() {
    let err = parse("").unwrap_err();
    assert_eq!(err.message(), "expected query string, but got empty string");
    assert_eq!(err.pos(), 0);
    assert_eq!(err.line_col(), Some((0, 0)));
}

// ============================================================================
// Lexical errors
// ============================================================================

#[test]
fn test_lexer_error_single_caret() {
    assert_eq!(
        diagnostic("a: \"abc"),
        "line 0:3 expected double quote closed\na: \"abc\n   ^\n"
    );
}

#[test]
fn test_lexer_error_at_backslash() {
    assert_eq!(
        diagnostic(r"a: x\y"),
        "line 0:4 unexpected escapes\na: x\\y\n    ^\n"
    );
}

#[test]
fn test_lexer_error_kind_and_source() {
    let err = parse("a: 1.x").unwrap_err();
    match err.kind() {
        ErrorKind::Lex(e) => {
            assert_eq!(e.message, "expected digit, but got \"x\"");
            assert_eq!(e.pos, 3);
        }
        other => panic!("Expected lexer error, got {:?}", other),
    }
    assert_eq!(err.last_token(), Some((Kind::Eq, ":")));
    assert!(err.source().is_some());
}

#[test]
fn test_lexer_error_carets_follow_previous_token() {
    let err = parse("status \"abc").unwrap_err();
    assert_eq!(err.last_token(), Some((Kind::Ident, "status")));
    assert_eq!(
        err.to_string(),
        "line 0:7 expected double quote closed\nstatus \"abc\n       ^^^^^^\n"
    );
}

#[test]
fn test_lexer_error_on_first_token() {
    let err = parse("\"abc").unwrap_err();
    assert!(err.last_token().is_none());
    assert_eq!(err.to_string(), "line 0:0 expected double quote closed\n\"abc\n^\n");
}

#[test]
fn test_grammar_error_has_no_source() {
    let err = parse("foo bar").unwrap_err();
    assert!(err.source().is_none());
    assert_eq!(err.last_token(), Some((Kind::Ident, "bar")));
}

// ============================================================================
// Lines and columns
// ============================================================================

#[test]
fn test_error_on_second_line() {
    assert_eq!(
        diagnostic("a: 1 AND\nb c"),
        "line 1:2 expected keyword OR|AND, but got \"c\"\nb c\n  ^\n"
    );
}

#[test]
fn test_column_counts_chars() {
    let err = parse("név bar").unwrap_err();
    assert_eq!(err.pos(), 5);
    assert_eq!(err.line_col(), Some((0, 4)));
    assert_eq!(
        err.to_string(),
        "line 0:4 expected keyword OR|AND, but got \"bar\"\nnév bar\n    ^^^\n"
    );
}

#[test]
fn test_multibyte_token_caret_count() {
    let err = parse("a ééé").unwrap_err();
    assert!(err.to_string().ends_with("a ééé\n  ^^^\n"));
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_wrapping_is_idempotent() {
    let err = parse("foo bar").unwrap_err();
    let wrapped = ParseError::new("other", None, 0, err.clone());
    assert_eq!(wrapped, err);
    assert_eq!(wrapped.source_text(), "foo bar");
}

#[test]
fn test_position_outside_source() {
    let err = ParseError::new("ab", None, 99, ErrorKind::TooDeep { limit: 1 });
    assert_eq!(err.line_col(), None);
    assert_eq!(err.to_string(), "expression nesting exceeds limit of 1");
}

#[test]
fn test_limit_messages() {
    let err = parse_with("((a))", ParserConfig::default().with_max_depth(1)).unwrap_err();
    assert_eq!(err.message(), "expression nesting exceeds limit of 1");

    let err = parse_with("a OR b OR c", ParserConfig::default().with_max_terms(2)).unwrap_err();
    assert_eq!(err.message(), "boolean chain exceeds limit of 2 terms");
    assert_eq!(err.pos(), 7);
}
