use crate::{Condition, EngineError, Rule, Ruleset, RulesetBuilder, StandardCondition};

/// Name given to a ruleset whose source has no `ruleset` header.
pub const DEFAULT_RULESET_NAME: &str = "default";

/// The result of parsing a DSL input string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRuleset {
    pub name: Option<String>,
    pub rules: Vec<ParsedRule>,
}

/// One `rule name:` block and its conditions, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    pub name: String,
    pub conditions: Vec<ParsedCondition>,
}

/// One `cond: subject.attribute CMP literal -> x else y` line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCondition {
    pub name: String,
    pub check: StandardCondition,
}

impl ParsedRuleset {
    /// Build a [`Ruleset`] of standard conditions. Every rule gets
    /// [`NoAction`](crate::NoAction).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateRule`] if two rules share a name.
    pub fn into_ruleset(self) -> Result<Ruleset, EngineError> {
        let name = self
            .name
            .unwrap_or_else(|| DEFAULT_RULESET_NAME.to_owned());
        self.rules
            .into_iter()
            .fold(RulesetBuilder::new(name), |builder, parsed| {
                let conditions = parsed
                    .conditions
                    .into_iter()
                    .map(|c| Condition::standard(c.name, c.check));
                builder.with_rule(Rule::named(parsed.name).with_conditions(conditions))
            })
            .build()
    }
}
