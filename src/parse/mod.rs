mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::{ParsedCondition, ParsedRule, ParsedRuleset, DEFAULT_RULESET_NAME};

/// Parse a DSL input string into a [`ParsedRuleset`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax.
pub fn parse(input: &str) -> Result<ParsedRuleset, ParseError> {
    use winnow::Parser;
    grammar::parse_ruleset
        .parse(input)
        .map_err(|e| ParseError::at_offset(e.inner().to_string(), input, e.offset()))
}
