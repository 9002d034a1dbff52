use std::fmt;

use super::outcome::Outcome;

/// One record of a ruleset run: which rule of which ruleset was evaluated
/// against which fact, and what it returned.
///
/// A run appends one record per rule visited, redirect hops included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[must_use]
pub struct RuleResult {
    ruleset_name: String,
    rule_name: String,
    fact_name: String,
    outcome: Outcome,
}

impl fmt::Display for RuleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} on '{}' = {}",
            self.ruleset_name, self.rule_name, self.fact_name, self.outcome
        )
    }
}

impl RuleResult {
    pub fn new(
        ruleset_name: impl Into<String>,
        rule_name: impl Into<String>,
        fact_name: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            ruleset_name: ruleset_name.into(),
            rule_name: rule_name.into(),
            fact_name: fact_name.into(),
            outcome,
        }
    }

    #[must_use]
    pub fn ruleset_name(&self) -> &str {
        &self.ruleset_name
    }

    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    #[must_use]
    pub fn fact_name(&self) -> &str {
        &self.fact_name
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub(crate) fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }
}
