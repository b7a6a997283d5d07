// tests/cli_tests.rs

use kql_parser::ParserConfig;
use kql_parser::cli::{
    CheckMode, CheckOptions, CheckResult, CliError, DocCategory, execute_check,
    get_doc_category, get_docs_overview,
};

fn run(query: &str, mode: CheckMode) -> Result<CheckResult, CliError> {
    execute_check(&CheckOptions {
        query: query.to_string(),
        config: ParserConfig::default(),
        mode,
    })
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn test_check_valid() {
    assert_eq!(run("a: 1 AND b", CheckMode::Syntax).unwrap(), CheckResult::SyntaxValid);
}

#[test]
fn test_check_invalid_keeps_diagnostic() {
    let err = run("foo bar", CheckMode::Syntax).unwrap_err();
    assert!(matches!(err, CliError::Parse(_)));
    assert_eq!(
        err.to_string(),
        "line 0:4 expected keyword OR|AND, but got \"bar\"\nfoo bar\n    ^^^\n"
    );
}

#[test]
fn test_check_uses_config() {
    let options = CheckOptions {
        query: "((a))".to_string(),
        config: ParserConfig::default().with_max_depth(1),
        mode: CheckMode::Syntax,
    };
    assert!(execute_check(&options).is_err());
}

// ============================================================================
// Format, AST and matches
// ============================================================================

#[test]
fn test_format() {
    let result = run("status:active  and age>=18", CheckMode::Format).unwrap();
    assert_eq!(
        result,
        CheckResult::Formatted("status: active AND age >= 18".to_string())
    );
}

#[test]
fn test_ast() {
    let CheckResult::Ast(value) = run("a: b", CheckMode::Ast).unwrap() else {
        panic!("Expected AST result");
    };
    assert_eq!(value["type"], "binary");
    assert_eq!(value["value"]["value"], "b");
}

#[test]
fn test_matches() {
    let CheckResult::Matches(matches) = run("s: (x OR NOT y*)", CheckMode::Matches).unwrap()
    else {
        panic!("Expected matches result");
    };
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["field"], "s");
    assert_eq!(matches[0]["operator"], ":");
    assert_eq!(matches[1]["value"], "y*");
    assert_eq!(matches[1]["negated"], true);
    assert_eq!(matches[1]["wildcard"], true);
}

// ============================================================================
// Documentation
// ============================================================================

#[test]
fn test_doc_categories() {
    let test_cases = vec![
        ("syntax", DocCategory::Syntax),
        ("OPS", DocCategory::Operators),
        ("escapes", DocCategory::Escapes),
        ("wildcard", DocCategory::Wildcards),
    ];

    for (name, expected) in test_cases {
        assert_eq!(DocCategory::from_str(name), Some(expected), "Failed for: {}", name);
        assert!(get_doc_category(name).is_ok());
    }
}

#[test]
fn test_unknown_doc_category() {
    let err = get_doc_category("pipes").unwrap_err();
    assert!(matches!(err, CliError::UnknownCategory(ref c) if c == "pipes"));
    assert!(err.to_string().contains("kql docs"));
}

#[test]
fn test_overview_lists_categories() {
    let overview = get_docs_overview();
    for name in ["syntax", "operators", "escapes", "wildcards"] {
        assert!(overview.contains(name), "Missing category: {}", name);
    }
}

#[test]
fn test_doc_examples_parse() {
    // queries quoted as valid in the docs
    for query in [
        "status: active",
        "age >= 18",
        "NOT deleted: true",
        "a: 1 AND (b: 2 OR c: 3)",
        "name: \"Jane Doe\"",
        "path: /usr/*",
        r"path: C\:\\temp",
        "msg: \"a: (b)\"",
        "host: *.example.com",
        "code: 5.*",
    ] {
        assert!(run(query, CheckMode::Syntax).is_ok(), "Failed for: {}", query);
    }
}
