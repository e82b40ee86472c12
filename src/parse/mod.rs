mod error;
mod grammar;

pub use error::ParseError;

use crate::SimpleRule;

/// Parse rule text into raw rule groups: an `AND` of groups, each an `OR`
/// of simple rules.
///
/// The groups are neither validated nor normalized; pass them through
/// [`try_construct_rule`](crate::try_construct_rule) or use
/// [`Rule::from_dsl`](crate::Rule::from_dsl).
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid rule text.
pub fn parse(input: &str) -> Result<Vec<Vec<SimpleRule>>, ParseError> {
    use winnow::Parser;
    grammar::parse_groups
        .parse(input)
        .map_err(|e| ParseError::new(e.offset(), e.inner().to_string()))
}
