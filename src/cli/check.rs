//! Parse a query and report on it

use super::CliError;
use crate::output::{expr_to_value, match_to_value};
use crate::{ParserConfig, parse_with};

/// What to produce from a successfully parsed query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckMode {
    /// Only validate syntax
    #[default]
    Syntax,
    /// Canonical rendering
    Format,
    /// AST as JSON
    Ast,
    /// Leaf comparisons as JSON
    Matches,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to parse
    pub query: String,
    /// Parser limits
    pub config: ParserConfig,
    /// What to produce on success
    pub mode: CheckMode,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Canonical text of the query
    Formatted(String),
    /// JSON tree of the query
    Ast(serde_json::Value),
    /// One JSON object per leaf comparison, in source order
    Matches(Vec<serde_json::Value>),
}

/// Execute a kql check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expr = parse_with(&options.query, options.config)?;

    let result = match options.mode {
        CheckMode::Syntax => CheckResult::SyntaxValid,
        CheckMode::Format => CheckResult::Formatted(expr.render()),
        CheckMode::Ast => CheckResult::Ast(expr_to_value(&expr)),
        CheckMode::Matches => {
            CheckResult::Matches(expr.matches().iter().map(match_to_value).collect())
        }
    };
    Ok(result)
}
