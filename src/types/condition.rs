use std::fmt;

use super::comparator::Comparator;
use super::fact::Fact;
use super::knowledge::KnowledgeBase;
use super::outcome::Outcome;

/// Signature of a condition test.
pub type ConditionFn = dyn Fn(&Fact, &mut KnowledgeBase) -> Outcome;

/// A named test run against a fact as part of a [`Rule`](super::Rule).
///
/// The test receives the knowledge base of the current run and may read or
/// write it, e.g. to remember what it found for a later rule.
pub struct Condition {
    name: String,
    test: Box<ConditionFn>,
}

impl Condition {
    pub fn new(
        name: impl Into<String>,
        test: impl Fn(&Fact, &mut KnowledgeBase) -> Outcome + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            test: Box::new(test),
        }
    }

    /// Build a condition from a declarative [`StandardCondition`].
    pub fn standard(name: impl Into<String>, check: StandardCondition) -> Self {
        Self::new(name, move |fact, _| check.evaluate(fact))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test(&self, fact: &Fact, kb: &mut KnowledgeBase) -> Outcome {
        (self.test)(fact, kb)
    }

    pub(crate) fn replace_test(&mut self, test: Box<ConditionFn>) {
        self.test = test;
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A `subject.attribute COMPARATOR literal` check that maps the comparison
/// to one outcome when it holds and another when it does not.
///
/// By default a holding comparison passes and anything else fails.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardCondition {
    pub subject: String,
    pub attribute: String,
    pub comparator: Comparator,
    pub literal: String,
    pub on_pass: Outcome,
    pub on_fail: Outcome,
}

impl StandardCondition {
    pub fn new(
        subject: impl Into<String>,
        attribute: impl Into<String>,
        comparator: Comparator,
        literal: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            attribute: attribute.into(),
            comparator,
            literal: literal.into(),
            on_pass: Outcome::Pass,
            on_fail: Outcome::Fail,
        }
    }

    /// Outcome returned when the comparison holds.
    #[must_use]
    pub fn on_pass(mut self, outcome: Outcome) -> Self {
        self.on_pass = outcome;
        self
    }

    /// Outcome returned when the comparison does not hold.
    #[must_use]
    pub fn on_fail(mut self, outcome: Outcome) -> Self {
        self.on_fail = outcome;
        self
    }

    #[must_use]
    pub fn evaluate(&self, fact: &Fact) -> Outcome {
        if fact.has_value(&self.subject, &self.attribute, self.comparator, &self.literal) {
            self.on_pass.clone()
        } else {
            self.on_fail.clone()
        }
    }
}

impl fmt::Display for StandardCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {} \"{}\" -> {} else {}",
            self.subject, self.attribute, self.comparator, self.literal, self.on_pass, self.on_fail
        )
    }
}
