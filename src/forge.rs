use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::{EngineError, Fact, KnowledgeBase, RuleResult, RunOptions, Ruleset};

/// A registry of named rulesets and facts sharing one [`KnowledgeBase`].
///
/// Facts keep the order they were added in; re-adding a fact with an
/// existing name replaces it in place. Bulk runs visit facts in that order.
///
/// # Example
///
/// ```
/// use ruleforge::{Fact, Outcome, RuleForge, RulesetBuilder, RunOptions};
///
/// let mut forge = RuleForge::new();
/// forge.add_ruleset(
///     RulesetBuilder::new("scores")
///         .rule("positive", |r| {
///             r.condition("check", |fact, _| match fact.get("player.score") {
///                 Some(score) if score.as_i64().is_some_and(|s| s > 0) => Outcome::Pass,
///                 _ => Outcome::Fail,
///             })
///         })
///         .build()
///         .unwrap(),
/// );
/// forge.add_fact(Fact::new("jack").set("player.score", 5));
/// forge.add_fact(Fact::new("jill").set("player.score", 0));
///
/// let results = forge.run_bulk("scores", RunOptions::default()).unwrap();
/// let outcomes: Vec<_> = results.iter().map(|r| r.outcome().as_str()).collect();
/// assert_eq!(outcomes, ["PASS", "FAIL"]);
/// ```
#[derive(Debug, Default)]
pub struct RuleForge {
    rulesets: BTreeMap<String, Ruleset>,
    facts: Vec<Fact>,
    knowledge: KnowledgeBase,
}

impl RuleForge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing knowledge base.
    #[must_use]
    pub fn with_knowledge_base(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = knowledge;
        self
    }

    /// Register `ruleset` under its name, returning any ruleset it replaced.
    pub fn add_ruleset(&mut self, ruleset: Ruleset) -> Option<Ruleset> {
        debug!(ruleset = ruleset.name(), rules = ruleset.len(), "ruleset registered");
        self.rulesets.insert(ruleset.name().to_owned(), ruleset)
    }

    pub fn remove_ruleset(&mut self, name: &str) -> Option<Ruleset> {
        self.rulesets.remove(name)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::RulesetNotFound`] if no ruleset has that name.
    pub fn ruleset(&self, name: &str) -> Result<&Ruleset, EngineError> {
        self.rulesets
            .get(name)
            .ok_or_else(|| ruleset_not_found(name))
    }

    /// # Errors
    ///
    /// Returns [`EngineError::RulesetNotFound`] if no ruleset has that name.
    pub fn ruleset_mut(&mut self, name: &str) -> Result<&mut Ruleset, EngineError> {
        self.rulesets
            .get_mut(name)
            .ok_or_else(|| ruleset_not_found(name))
    }

    /// Registered ruleset names, sorted.
    #[must_use]
    pub fn ruleset_names(&self) -> Vec<&str> {
        self.rulesets.keys().map(String::as_str).collect()
    }

    /// Store `fact`, replacing a stored fact of the same name in place.
    pub fn add_fact(&mut self, fact: Fact) {
        match self.facts.iter().position(|f| f.name() == fact.name()) {
            Some(idx) => self.facts[idx] = fact,
            None => self.facts.push(fact),
        }
    }

    #[must_use]
    pub fn fact(&self, name: &str) -> Option<&Fact> {
        self.facts.iter().find(|f| f.name() == name)
    }

    pub fn remove_fact(&mut self, name: &str) -> Option<Fact> {
        let idx = self.facts.iter().position(|f| f.name() == name)?;
        Some(self.facts.remove(idx))
    }

    /// Stored facts in insertion order.
    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    #[must_use]
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn knowledge_base_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge
    }

    /// Run the named ruleset against the stored fact called `fact`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RulesetNotFound`] or [`EngineError::FactNotFound`]
    /// for unknown names, otherwise whatever [`Ruleset::run_rules`] returns.
    pub fn run(
        &mut self,
        ruleset: &str,
        fact: &str,
        options: RunOptions,
    ) -> Result<RuleResult, EngineError> {
        let target = self
            .rulesets
            .get_mut(ruleset)
            .ok_or_else(|| ruleset_not_found(ruleset))?;
        let stored = self
            .facts
            .iter()
            .find(|f| f.name() == fact)
            .ok_or_else(|| EngineError::FactNotFound {
                fact: fact.to_owned(),
            })?;
        target.run_rules(stored, &mut self.knowledge, options)
    }

    /// Run the named ruleset against a fact that is not stored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RulesetNotFound`] for an unknown ruleset,
    /// otherwise whatever [`Ruleset::run_rules`] returns.
    pub fn run_fact(
        &mut self,
        ruleset: &str,
        fact: &Fact,
        options: RunOptions,
    ) -> Result<RuleResult, EngineError> {
        let target = self
            .rulesets
            .get_mut(ruleset)
            .ok_or_else(|| ruleset_not_found(ruleset))?;
        target.run_rules(fact, &mut self.knowledge, options)
    }

    /// Run the named ruleset against every stored fact in insertion order
    /// and return the concatenated result logs of all runs.
    ///
    /// Afterwards [`results`](Self::results) holds only the last run's log.
    ///
    /// # Errors
    ///
    /// Stops at the first fact whose run returns an error.
    pub fn run_bulk(
        &mut self,
        ruleset: &str,
        options: RunOptions,
    ) -> Result<Vec<RuleResult>, EngineError> {
        let target = self
            .rulesets
            .get_mut(ruleset)
            .ok_or_else(|| ruleset_not_found(ruleset))?;
        info!(ruleset, facts = self.facts.len(), "bulk run started");
        let mut all = Vec::new();
        for fact in &self.facts {
            target.run_rules(fact, &mut self.knowledge, options)?;
            all.extend_from_slice(target.results());
        }
        Ok(all)
    }

    /// Fire the actions of the rules that passed in the named ruleset's
    /// last run.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RulesetNotFound`] for an unknown ruleset,
    /// otherwise whatever [`Ruleset::fire_all_passes`] returns.
    pub fn fire_all_passes(
        &mut self,
        ruleset: &str,
        payload: Option<&Fact>,
    ) -> Result<(), EngineError> {
        let target = self
            .rulesets
            .get(ruleset)
            .ok_or_else(|| ruleset_not_found(ruleset))?;
        target.fire_all_passes(payload, &mut self.knowledge)
    }

    /// The result log of the named ruleset's last run.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RulesetNotFound`] if no ruleset has that name.
    pub fn results(&self, ruleset: &str) -> Result<&[RuleResult], EngineError> {
        self.ruleset(ruleset).map(Ruleset::results)
    }
}

fn ruleset_not_found(name: &str) -> EngineError {
    EngineError::RulesetNotFound {
        ruleset: name.to_owned(),
    }
}
