//! JSON rendering of parsed queries.
//!
//! Turns an [`Expr`] tree into a `serde_json::Value` so tools can inspect a
//! query without linking against the AST types. Every node becomes an object
//! with a `type` tag and its `pos`/`end` byte span:
//!
//! - `binary` - `field`, `operator`, `negated`, `value`
//! - `combine` - `left`, `keyword`, `right`
//! - `paren` - `inner`
//! - `literal` - `kind`, `value`, `quoted`, `escape_offsets`, `number`
//! - `wildcard` - the literal fields plus `wildcard_offsets`
//!
//! # Examples
//!
//! ```
//! let expr = kql_parser::parse("status: active").unwrap();
//! let json = kql_parser::output::to_json(&expr);
//! assert!(json.contains(r#""type":"binary""#));
//! assert!(json.contains(r#""field":"status""#));
//! ```

use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value, json};

use crate::ast::{Expr, Kind, Literal, Match};

fn literal_fields(literal: &Literal) -> Map<String, Value> {
    let number = literal
        .as_decimal()
        .and_then(|d| match literal.kind {
            Kind::Int => d.to_i64().map(Number::from),
            _ => d.to_f64().and_then(Number::from_f64),
        })
        .map(Value::Number)
        .unwrap_or(Value::Null);

    let mut map = Map::new();
    map.insert("pos".into(), json!(literal.pos()));
    map.insert("end".into(), json!(literal.end()));
    map.insert("kind".into(), json!(literal.kind.as_str()));
    map.insert("value".into(), json!(literal.value));
    map.insert("quoted".into(), json!(literal.quoted));
    map.insert("escape_offsets".into(), json!(literal.escape_offsets));
    map.insert("number".into(), number);
    map
}

fn node_to_value(expr: &Expr) -> Value {
    match expr {
        Expr::Literal(l) => {
            let mut map = literal_fields(l);
            map.insert("type".into(), json!("literal"));
            Value::Object(map)
        }
        Expr::Wildcard(w) => {
            let mut map = literal_fields(w.literal());
            map.insert("type".into(), json!("wildcard"));
            map.insert("wildcard_offsets".into(), json!(w.wildcard_offsets()));
            Value::Object(map)
        }
        Expr::Paren(p) => json!({
            "type": "paren",
            "pos": p.l_pos,
            "end": p.r_pos,
            "inner": expr_to_value(&p.inner),
        }),
        Expr::Binary(b) => json!({
            "type": "binary",
            "pos": expr.pos(),
            "end": expr.end(),
            "field": if b.has_field() { json!(b.field) } else { Value::Null },
            "operator": b.operator.map(|k| k.as_str()),
            "negated": b.negated,
            "value": expr_to_value(&b.value),
        }),
        Expr::Combine(_) => expr_to_value(expr),
    }
}

/// Convert an expression tree into a JSON value.
pub fn expr_to_value(expr: &Expr) -> Value {
    // Walk the right spine of a chain without recursing into it.
    let mut spine = Vec::new();
    let mut node = expr;
    while let Expr::Combine(c) = node {
        spine.push(c);
        node = &*c.right;
    }

    let mut value = node_to_value(node);
    while let Some(c) = spine.pop() {
        value = json!({
            "type": "combine",
            "pos": c.left.pos(),
            "end": c.right.end(),
            "keyword": c.keyword.as_str(),
            "left": expr_to_value(&c.left),
            "right": value,
        });
    }
    value
}

/// A leaf comparison as JSON.
pub fn match_to_value(m: &Match<'_>) -> Value {
    json!({
        "field": m.field,
        "operator": m.operator.map(|k| k.as_str()),
        "negated": m.negated,
        "value": m.value.value,
        "kind": m.value.kind.as_str(),
        "wildcard": m.is_wildcard(),
    })
}

/// Compact JSON for an expression tree.
pub fn to_json(expr: &Expr) -> String {
    expr_to_value(expr).to_string()
}

/// Pretty-printed JSON (2-space indentation) for an expression tree.
pub fn to_json_pretty(expr: &Expr) -> String {
    // serializing a Value cannot fail
    serde_json::to_string_pretty(&expr_to_value(expr)).unwrap_or_default()
}
