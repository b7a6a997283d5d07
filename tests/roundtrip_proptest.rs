//! Property-based tests for parsing and rendering
//!
//! Queries are generated in canonical form, so rendering a parsed query must
//! give back the exact input.

use kql_parser::ast::{Expr, Kind};
use kql_parser::lexer::Lexer;
use kql_parser::parse;
use proptest::prelude::*;

fn field_strategy() -> impl Strategy<Value = String> {
    "f[a-z0-9_.]{0,6}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "v[a-z0-9]{0,6}",
        "-?[0-9]{1,5}",
        "[0-9]{1,3}\\.[0-9]{1,3}",
        "\"[a-z :()<>]{0,8}\"",
        "w[a-z]{0,3}\\*",
        "[a-z]{1,3}\\\\\\*",
        Just("\\AND".to_string()),
    ]
}

fn term_strategy() -> impl Strategy<Value = String> {
    let comparison = prop_oneof![
        value_strategy(),
        (field_strategy(), value_strategy()).prop_map(|(f, v)| format!("{}: {}", f, v)),
        (field_strategy(), "(<|>|<=|>=)", "-?[0-9]{1,4}")
            .prop_map(|(f, op, n)| format!("{} {} {}", f, op, n)),
    ];
    let leaf = (any::<bool>(), comparison)
        .prop_map(|(not, t)| if not { format!("NOT {}", t) } else { t });

    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            2 => inner.clone(),
            1 => (
                any::<bool>(),
                prop::collection::vec(inner.clone(), 1..4),
                prop::collection::vec(prop_oneof![Just("AND"), Just("OR")], 3),
            )
                .prop_map(|(not, terms, keywords)| {
                    let mut text = String::from(if not { "NOT (" } else { "(" });
                    for (i, term) in terms.iter().enumerate() {
                        if i > 0 {
                            text.push_str(&format!(" {} ", keywords[i - 1]));
                        }
                        text.push_str(term);
                    }
                    text.push(')');
                    text
                }),
            1 => (field_strategy(), inner.clone(), inner)
                .prop_map(|(f, a, b)| format!("{}: ({} OR {})", f, a, b)),
        ]
    })
}

fn query_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(term_strategy(), 1..6),
        prop::collection::vec(prop_oneof![Just("AND"), Just("OR")], 5),
    )
        .prop_map(|(terms, keywords)| {
            let mut text = String::new();
            for (i, term) in terms.iter().enumerate() {
                if i > 0 {
                    text.push_str(&format!(" {} ", keywords[i - 1]));
                }
                text.push_str(term);
            }
            text
        })
}

fn check_spans(expr: &Expr, len: usize) {
    let mut stack = vec![expr];
    while let Some(node) = stack.pop() {
        assert!(node.pos() <= node.end(), "Inverted span for {:?}", node);
        assert!(node.end() <= len);
        match node {
            Expr::Combine(c) => {
                assert!(c.left.end() <= c.right.pos());
                stack.push(&*c.left);
                stack.push(&*c.right);
            }
            Expr::Binary(b) => {
                assert!(b.start <= b.value.pos());
                stack.push(&*b.value);
            }
            Expr::Paren(p) => {
                assert!(p.l_pos < p.inner.pos() && p.inner.end() < p.r_pos);
                stack.push(&*p.inner);
            }
            Expr::Literal(_) | Expr::Wildcard(_) => {}
        }
    }
}

proptest! {
    #[test]
    fn test_canonical_query_renders_itself(query in query_strategy()) {
        let expr = parse(&query).unwrap();
        prop_assert_eq!(expr.render(), query);
    }

    #[test]
    fn test_rendering_is_stable(query in query_strategy()) {
        let first = parse(&query).unwrap().render();
        let second = parse(&first).unwrap().render();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_spans_are_ordered(query in query_strategy()) {
        let expr = parse(&query).unwrap();
        prop_assert_eq!(expr.pos(), 0);
        prop_assert_eq!(expr.end(), query.len());
        check_spans(&expr, query.len());
    }

    #[test]
    fn test_token_positions_increase(query in query_strategy()) {
        let tokens = Lexer::new(&query).tokenize().unwrap();
        let mut last_end = 0;
        for token in &tokens {
            prop_assert!(token.start_pos >= last_end);
            prop_assert!(token.end_pos >= token.start_pos);
            prop_assert!(token.kind != Kind::Illegal);
            last_end = token.end_pos;
        }
    }

    #[test]
    fn test_parse_never_panics(input in "\\PC{0,40}") {
        if let Err(e) = parse(&input) {
            let _ = e.to_string();
        }
    }

    #[test]
    fn test_parse_never_panics_on_query_chars(input in "[a-z0-9 :<>=()\"\\\\*.+-]{0,30}") {
        match parse(&input) {
            Ok(expr) => {
                let _ = expr.matches();
                prop_assert!(expr.end() <= input.len());
            }
            Err(e) => {
                prop_assert!(e.pos() <= input.len());
                let _ = e.to_string();
            }
        }
    }
}
