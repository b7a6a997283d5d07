pub mod ast;
pub mod cli;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;

pub use ast::{Binary, Combine, Expr, Kind, Literal, Match, Paren, Token, Wildcard};
pub use error::{ErrorCause, ErrorKind, ParseError};
pub use lexer::{LexError, Lexer};
pub use output::{expr_to_value, match_to_value, to_json, to_json_pretty};
pub use parser::{Parser, ParserConfig};

/// Parse a query with the default limits.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    Parser::new(input).parse()
}

/// Parse a query with explicit limits.
pub fn parse_with(input: &str, config: ParserConfig) -> Result<Expr, ParseError> {
    Parser::new(input).with_config(config).parse()
}
