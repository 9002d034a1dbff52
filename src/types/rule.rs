use std::fmt;

use super::action::{Action, NoAction};
use super::condition::Condition;
use super::error::{ActionError, EngineError};
use super::fact::Fact;
use super::knowledge::KnowledgeBase;
use super::outcome::Outcome;

/// A named, ordered list of conditions guarding one action.
///
/// Conditions run in insertion order. Adding a condition whose name is
/// already present replaces it in place, so names stay unique and the
/// original position is kept.
pub struct Rule {
    name: String,
    conditions: Vec<Condition>,
    action: Box<dyn Action>,
}

impl Rule {
    pub fn new(name: impl Into<String>, action: impl Action + 'static) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
            action: Box::new(action),
        }
    }

    /// A rule with no conditions and [`NoAction`]. It passes every fact.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, NoAction)
    }

    /// Builder form of [`add_condition`](Self::add_condition).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.add_condition(condition);
        self
    }

    #[must_use]
    pub fn with_conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        for condition in conditions {
            self.add_condition(condition);
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.name() == name)
    }

    pub fn add_condition(&mut self, condition: Condition) {
        match self.index_of(condition.name()) {
            Some(idx) => self.conditions[idx] = condition,
            None => self.conditions.push(condition),
        }
    }

    /// # Errors
    ///
    /// Returns [`EngineError::ConditionNotFound`] if no condition has that name.
    pub fn remove_condition(&mut self, name: &str) -> Result<Condition, EngineError> {
        let idx = self.position(name)?;
        Ok(self.conditions.remove(idx))
    }

    /// Swap the test of an existing condition, keeping its name and position.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConditionNotFound`] if no condition has that name.
    pub fn update_condition(
        &mut self,
        name: &str,
        test: impl Fn(&Fact, &mut KnowledgeBase) -> Outcome + 'static,
    ) -> Result<(), EngineError> {
        let idx = self.position(name)?;
        self.conditions[idx].replace_test(Box::new(test));
        Ok(())
    }

    pub fn set_action(&mut self, action: impl Action + 'static) {
        self.action = Box::new(action);
    }

    pub(crate) fn set_boxed_action(&mut self, action: Box<dyn Action>) {
        self.action = action;
    }

    /// Run the conditions in order and return the first outcome that is not
    /// [`Outcome::Pass`], or `Pass` when every condition passes.
    pub fn test_conditions(&self, fact: &Fact, kb: &mut KnowledgeBase) -> Outcome {
        for condition in &self.conditions {
            let outcome = condition.test(fact, kb);
            if !outcome.is_pass() {
                return outcome;
            }
        }
        Outcome::Pass
    }

    /// # Errors
    ///
    /// Propagates the [`ActionError`] returned by the action.
    pub fn fire_action(
        &self,
        payload: Option<&Fact>,
        kb: &mut KnowledgeBase,
    ) -> Result<(), ActionError> {
        self.action.act(payload, kb)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.conditions.iter().position(|c| c.name() == name)
    }

    fn position(&self, name: &str) -> Result<usize, EngineError> {
        self.index_of(name)
            .ok_or_else(|| EngineError::ConditionNotFound {
                rule: self.name.clone(),
                condition: name.to_owned(),
            })
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("conditions", &self.conditions)
            .finish_non_exhaustive()
    }
}
