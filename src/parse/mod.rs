mod error;
mod grammar;

pub use error::ParseError;

use crate::types::Expr;

/// Parse decision-expression source text into an [`Expr`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a single valid expression.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    use winnow::Parser;
    grammar::expression
        .parse(input)
        .map_err(ParseError::from_parse)
}
