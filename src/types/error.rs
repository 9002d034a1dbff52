use thiserror::Error;

/// Errors raised while managing or running a [`Ruleset`](super::Ruleset).
///
/// Every variant aborts the whole run it occurs in; nothing is retried.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rule '{rule}' does not exist in ruleset '{ruleset}'")]
    RuleNotFound { ruleset: String, rule: String },

    #[error("condition '{condition}' does not exist in rule '{rule}'")]
    ConditionNotFound { rule: String, condition: String },

    #[error("ruleset '{ruleset}' does not exist")]
    RulesetNotFound { ruleset: String },

    #[error("fact '{fact}' does not exist")]
    FactNotFound { fact: String },

    #[error("duplicate rule name '{rule}' in ruleset '{ruleset}'")]
    DuplicateRule { ruleset: String, rule: String },

    #[error("ruleset '{ruleset}' has no rules to run")]
    EmptyRuleset { ruleset: String },

    #[error("an error occurred when running rule '{rule}'")]
    ConditionError { rule: String },

    #[error(
        "infinite loop when running rule '{rule}': it redirects back to rule '{target}' which has already run"
    )]
    InfiniteLoop { rule: String, target: String },

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Errors raised by an [`Action`](super::Action) when it fires.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("relationship action '{relationship}' was fired without a fact payload")]
    MissingPayload { relationship: String },

    #[error("fact '{fact}' has no 'subject' field for relationship '{relationship}'")]
    MissingSubject { relationship: String, fact: String },

    #[error("action failed: {0}")]
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown comparator '{0}'")]
pub struct UnknownComparator(pub String);
