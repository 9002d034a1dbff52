use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

use tracing::debug;

use super::action::{Action, NoAction};
use super::condition::{Condition, StandardCondition};
use super::error::EngineError;
use super::fact::Fact;
use super::knowledge::KnowledgeBase;
use super::options::RunOptions;
use super::outcome::Outcome;
use super::result::RuleResult;
use super::rule::Rule;
use super::run_report::RunReport;
use crate::evaluate::{self, RunLog};

/// Builder for constructing a [`Ruleset`].
///
/// Each call returns the builder, so a ruleset is assembled in one
/// expression without any hidden "current rule" state.
///
/// # Example
///
/// ```
/// use ruleforge::{action_fn, Comparator, KnowledgeBase, Fact, Outcome, RulesetBuilder, StandardCondition};
///
/// let mut ruleset = RulesetBuilder::new("Example")
///     .rule("rule1", |r| {
///         r.condition("cond1", |fact, _| {
///             if fact.has_attribute("subject1", "attribute1") {
///                 Outcome::Pass
///             } else {
///                 Outcome::Fail
///             }
///         })
///         .condition("cond2", |_, _| Outcome::redirect("rule2"))
///         .action(action_fn(|_, _| println!("Act1")))
///     })
///     .rule("rule2", |r| {
///         r.standard(
///             "cond3",
///             StandardCondition::new("subject2", "attribute3", Comparator::Equal, "failme")
///                 .on_pass(Outcome::Fail)
///                 .on_fail(Outcome::Pass),
///         )
///     })
///     .build()
///     .unwrap();
///
/// let fact = Fact::new("fact1")
///     .set("subject1.attribute1", true)
///     .set("subject2.attribute3", "passme");
/// let result = ruleset.run(&fact, &mut KnowledgeBase::new()).unwrap();
/// assert_eq!(result.outcome(), &Outcome::Pass);
/// ```
#[derive(Debug)]
pub struct RulesetBuilder {
    name: String,
    rules: Vec<Rule>,
}

/// Intermediate builder passed to the rule definition closure.
pub struct RuleBuilder {
    conditions: Vec<Condition>,
    action: Box<dyn Action>,
}

impl RulesetBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Define a rule. A rule with no `.action(..)` gets [`NoAction`].
    #[must_use]
    pub fn rule(mut self, name: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder {
            conditions: Vec::new(),
            action: Box::new(NoAction),
        });
        let mut rule = Rule::named(name).with_conditions(builder.conditions);
        rule.set_boxed_action(builder.action);
        self.rules.push(rule);
        self
    }

    /// Add an already-built rule.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Assemble the `Ruleset`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateRule`] if two rules share a name.
    pub fn build(self) -> Result<Ruleset, EngineError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name()) {
                return Err(EngineError::DuplicateRule {
                    ruleset: self.name.clone(),
                    rule: rule.name().to_owned(),
                });
            }
        }
        let mut ruleset = Ruleset::new(self.name);
        ruleset.rules = self.rules;
        Ok(ruleset)
    }
}

impl RuleBuilder {
    /// Append a condition. Conditions run in the order they are added.
    #[must_use]
    pub fn condition(
        mut self,
        name: &str,
        test: impl Fn(&Fact, &mut KnowledgeBase) -> Outcome + 'static,
    ) -> Self {
        self.conditions.push(Condition::new(name, test));
        self
    }

    #[must_use]
    pub fn standard(mut self, name: &str, check: StandardCondition) -> Self {
        self.conditions.push(Condition::standard(name, check));
        self
    }

    /// Set the action fired when the rule passes.
    #[must_use]
    pub fn action(mut self, action: impl Action + 'static) -> Self {
        self.action = Box::new(action);
        self
    }
}

impl fmt::Debug for RuleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBuilder")
            .field("conditions", &self.conditions)
            .finish_non_exhaustive()
    }
}

/// A named, ordered collection of rules, evaluated one fact at a time.
///
/// The ruleset keeps the log of its most recent run: every
/// [`RuleResult`] recorded and the names of the rules whose chains passed.
/// Both are reset when the next run starts.
#[derive(Debug)]
pub struct Ruleset {
    name: String,
    rules: Vec<Rule>,
    passed_rules: Vec<String>,
    results: Vec<RuleResult>,
}

impl Ruleset {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            passed_rules: Vec::new(),
            results: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a rule at the end of the evaluation order. A rule with the same
    /// name is replaced in place.
    pub fn add_rule(&mut self, rule: Rule) {
        debug!(ruleset = %self.name, rule = rule.name(), "rule added");
        match self.rules.iter().position(|r| r.name() == rule.name()) {
            Some(idx) => self.rules[idx] = rule,
            None => self.rules.push(rule),
        }
    }

    /// # Errors
    ///
    /// Returns [`EngineError::RuleNotFound`] if no rule has that name.
    pub fn get_rule(&self, name: &str) -> Result<&Rule, EngineError> {
        evaluate::find_rule(&self.rules, name).ok_or_else(|| self.not_found(name))
    }

    /// # Errors
    ///
    /// Returns [`EngineError::RuleNotFound`] if no rule has that name.
    pub fn get_rule_mut(&mut self, name: &str) -> Result<&mut Rule, EngineError> {
        match self.rules.iter().position(|r| r.name() == name) {
            Some(idx) => Ok(&mut self.rules[idx]),
            None => Err(self.not_found(name)),
        }
    }

    /// Remove and return the named rule, if present.
    pub fn remove_rule(&mut self, name: &str) -> Option<Rule> {
        let idx = self.rules.iter().position(|r| r.name() == name)?;
        Some(self.rules.remove(idx))
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rule names in evaluation order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// [`run_rules`](Self::run_rules) with [`RunOptions::default()`].
    ///
    /// # Errors
    ///
    /// See [`run_rules`](Self::run_rules).
    pub fn run(&mut self, fact: &Fact, kb: &mut KnowledgeBase) -> Result<RuleResult, EngineError> {
        self.run_rules(fact, kb, RunOptions::default())
    }

    /// Evaluate every rule against `fact` in insertion order, following
    /// redirects.
    ///
    /// Returns the result of the first chain that fails, or the last result
    /// recorded when every chain passes. [`results()`](Self::results) holds
    /// the full log afterwards, including runs that end in an error.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConditionError`] when a condition returns `ERROR`;
    /// - [`EngineError::InfiniteLoop`] when a chain revisits a rule and
    ///   `fail_on_infinite` is off;
    /// - [`EngineError::RuleNotFound`] when a redirect names an unknown rule;
    /// - [`EngineError::Action`] when a fired action fails;
    /// - [`EngineError::EmptyRuleset`] when there are no rules.
    pub fn run_rules(
        &mut self,
        fact: &Fact,
        kb: &mut KnowledgeBase,
        options: RunOptions,
    ) -> Result<RuleResult, EngineError> {
        evaluate::run_rules(
            &self.name,
            &self.rules,
            fact,
            kb,
            options,
            RunLog {
                results: &mut self.results,
                passed: &mut self.passed_rules,
            },
        )
    }

    /// Run like [`run_rules`](Self::run_rules) and return a [`RunReport`]
    /// with the result, the result log, the passed rules and timing.
    ///
    /// # Errors
    ///
    /// See [`run_rules`](Self::run_rules).
    pub fn run_rules_detailed(
        &mut self,
        fact: &Fact,
        kb: &mut KnowledgeBase,
        options: RunOptions,
    ) -> Result<RunReport, EngineError> {
        let start = Instant::now();
        let result = self.run_rules(fact, kb, options)?;
        let duration = start.elapsed();
        Ok(RunReport::new(
            result,
            self.results.clone(),
            self.passed_rules.clone(),
            duration,
        ))
    }

    /// Every result recorded by the last run, redirect hops included.
    #[must_use]
    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    /// Names of the rules whose chains passed in the last run.
    #[must_use]
    pub fn passed_rules(&self) -> &[String] {
        &self.passed_rules
    }

    /// Fire the action of every rule that passed in the last run, in the
    /// order they passed, with `payload`.
    ///
    /// Use with `fire_on_pass` disabled to act only once a full run has
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns the first [`EngineError::Action`] raised, or
    /// [`EngineError::RuleNotFound`] if a passed rule was removed since.
    pub fn fire_all_passes(
        &self,
        payload: Option<&Fact>,
        kb: &mut KnowledgeBase,
    ) -> Result<(), EngineError> {
        evaluate::fire_all(&self.name, &self.rules, &self.passed_rules, payload, kb)
    }

    /// Parse a DSL string into a `Ruleset` of standard conditions.
    ///
    /// Parsed rules carry [`NoAction`]; attach actions afterwards with
    /// [`get_rule_mut`](Self::get_rule_mut).
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`](crate::ForgeError) on parse failure or duplicate
    /// rule names.
    pub fn from_dsl(input: &str) -> Result<Self, crate::ForgeError> {
        let parsed = crate::parse::parse(input)?;
        Ok(parsed.into_ruleset()?)
    }

    /// Read a DSL file and build a `Ruleset` from it.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`](crate::ForgeError) on I/O, parse or build failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::ForgeError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }

    fn not_found(&self, rule: &str) -> EngineError {
        EngineError::RuleNotFound {
            ruleset: self.name.clone(),
            rule: rule.to_owned(),
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ruleset({}, {} rules)", self.name, self.rules.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_rules_in_order() {
        let ruleset = RulesetBuilder::new("rs")
            .rule("first", |r| r.condition("c", |_, _| Outcome::Pass))
            .rule("second", |r| r)
            .with_rule(Rule::named("third"))
            .build()
            .unwrap();
        assert_eq!(ruleset.rule_names(), ["first", "second", "third"]);
        assert_eq!(ruleset.get_rule("first").unwrap().conditions().len(), 1);
    }

    #[test]
    fn builder_rejects_duplicate_rules() {
        let result = RulesetBuilder::new("rs")
            .rule("dup", |r| r)
            .rule("dup", |r| r)
            .build();
        assert!(matches!(
            result,
            Err(EngineError::DuplicateRule { rule, .. }) if rule == "dup"
        ));
    }

    #[test]
    fn add_rule_replaces_same_name_in_place() {
        let mut ruleset = Ruleset::new("rs");
        ruleset.add_rule(Rule::named("a"));
        ruleset.add_rule(Rule::named("b"));
        ruleset.add_rule(
            Rule::named("a").with_condition(Condition::new("c", |_, _| Outcome::Fail)),
        );
        assert_eq!(ruleset.rule_names(), ["a", "b"]);
        assert_eq!(ruleset.get_rule("a").unwrap().conditions().len(), 1);
    }

    #[test]
    fn get_missing_rule_errors() {
        let ruleset = Ruleset::new("rs");
        let err = ruleset.get_rule("ghost").unwrap_err();
        assert_eq!(err.to_string(), "rule 'ghost' does not exist in ruleset 'rs'");
    }

    #[test]
    fn remove_rule() {
        let mut ruleset = Ruleset::new("rs");
        ruleset.add_rule(Rule::named("a"));
        assert!(ruleset.remove_rule("a").is_some());
        assert!(ruleset.remove_rule("a").is_none());
        assert!(ruleset.is_empty());
    }

    #[test]
    fn results_reset_between_runs() {
        let mut ruleset = RulesetBuilder::new("rs")
            .rule("a", |r| {
                r.condition("c", |fact, _| {
                    if fact.has_subject("ok") {
                        Outcome::Pass
                    } else {
                        Outcome::Fail
                    }
                })
            })
            .rule("b", |r| r)
            .build()
            .unwrap();
        let mut kb = KnowledgeBase::new();

        ruleset.run(&Fact::new("good").set("ok", true), &mut kb).unwrap();
        assert_eq!(ruleset.results().len(), 2);
        assert_eq!(ruleset.passed_rules(), ["a", "b"]);

        let result = ruleset.run(&Fact::new("bad"), &mut kb).unwrap();
        assert_eq!(result.outcome(), &Outcome::Fail);
        assert_eq!(ruleset.results().len(), 1);
        assert!(ruleset.passed_rules().is_empty());
    }

    #[test]
    fn detailed_run_reports_log() {
        let mut ruleset = RulesetBuilder::new("rs")
            .rule("a", |r| r.condition("c", |_, _| Outcome::redirect("b")))
            .rule("b", |r| r)
            .build()
            .unwrap();
        let report = ruleset
            .run_rules_detailed(&Fact::new("f"), &mut KnowledgeBase::new(), RunOptions::default())
            .unwrap();
        assert_eq!(report.result().rule_name(), "b");
        assert_eq!(report.results().len(), 3);
        assert_eq!(report.passed(), ["a", "b"]);
    }

    #[test]
    fn display() {
        let ruleset = RulesetBuilder::new("Example")
            .rule("a", |r| r)
            .build()
            .unwrap();
        assert_eq!(ruleset.to_string(), "Ruleset(Example, 1 rules)");
    }
}
