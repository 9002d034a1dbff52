use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{EngineError, Fact, KnowledgeBase, Outcome, Rule, RuleResult, RunOptions};

/// Log the outcomes of one run of a ruleset.
pub(crate) struct RunLog<'a> {
    pub(crate) results: &'a mut Vec<RuleResult>,
    pub(crate) passed: &'a mut Vec<String>,
}

/// Run every rule against `fact`, following redirects.
///
/// Each top-level rule starts a chain. A redirect evaluates the named rule
/// against the same fact and the chain continues until it reaches a
/// terminal outcome. A chain ending in `PASS` fires the head rule's action
/// (when enabled) and moves on to the next rule; `FAIL` stops the run and
/// is returned; `ERROR` and redirect cycles abort the run with an error.
pub(crate) fn run_rules(
    ruleset_name: &str,
    rules: &[Rule],
    fact: &Fact,
    kb: &mut KnowledgeBase,
    options: RunOptions,
    log: RunLog<'_>,
) -> Result<RuleResult, EngineError> {
    let RunLog { results, passed } = log;
    results.clear();
    passed.clear();

    if rules.is_empty() {
        return Err(EngineError::EmptyRuleset {
            ruleset: ruleset_name.to_owned(),
        });
    }

    for head in rules {
        let mut current = head;
        let mut outcome = evaluate_rule(ruleset_name, current, fact, kb, results);
        let mut seen: HashSet<&str> = HashSet::from([head.name()]);

        loop {
            match outcome {
                Outcome::Pass => break,
                Outcome::Fail => {
                    debug!(
                        ruleset = ruleset_name,
                        rule = current.name(),
                        fact = fact.name(),
                        "chain failed, stopping run"
                    );
                    return last_result(results, ruleset_name);
                }
                Outcome::Error => {
                    warn!(
                        ruleset = ruleset_name,
                        rule = current.name(),
                        fact = fact.name(),
                        "condition reported an error"
                    );
                    return Err(EngineError::ConditionError {
                        rule: current.name().to_owned(),
                    });
                }
                Outcome::Redirect(target) => {
                    if seen.contains(target.as_str()) {
                        warn!(
                            ruleset = ruleset_name,
                            rule = current.name(),
                            target = %target,
                            fail_on_infinite = options.fail_on_infinite,
                            "redirect cycle detected"
                        );
                        if options.fail_on_infinite {
                            let failed = RuleResult::new(
                                ruleset_name,
                                current.name(),
                                fact.name(),
                                Outcome::Fail,
                            );
                            if let Some(entry) = results.last_mut() {
                                *entry = entry.clone().with_outcome(Outcome::Fail);
                            }
                            return Ok(failed);
                        }
                        return Err(EngineError::InfiniteLoop {
                            rule: current.name().to_owned(),
                            target,
                        });
                    }

                    current = find_rule(rules, &target).ok_or_else(|| {
                        EngineError::RuleNotFound {
                            ruleset: ruleset_name.to_owned(),
                            rule: target.clone(),
                        }
                    })?;
                    seen.insert(current.name());
                    outcome = evaluate_rule(ruleset_name, current, fact, kb, results);
                }
            }
        }

        debug!(
            ruleset = ruleset_name,
            rule = head.name(),
            fact = fact.name(),
            "chain passed"
        );
        passed.push(head.name().to_owned());
        if options.fire_on_pass {
            debug!(rule = head.name(), "firing action");
            head.fire_action(Some(fact), kb)?;
        }
    }

    debug!(
        ruleset = ruleset_name,
        fact = fact.name(),
        passed = passed.len(),
        "run completed"
    );
    last_result(results, ruleset_name)
}

/// Fire the action of every named rule, in order, with `payload`.
pub(crate) fn fire_all(
    ruleset_name: &str,
    rules: &[Rule],
    passed: &[String],
    payload: Option<&Fact>,
    kb: &mut KnowledgeBase,
) -> Result<(), EngineError> {
    for name in passed {
        let rule = find_rule(rules, name).ok_or_else(|| EngineError::RuleNotFound {
            ruleset: ruleset_name.to_owned(),
            rule: name.clone(),
        })?;
        debug!(ruleset = ruleset_name, rule = rule.name(), "firing deferred action");
        rule.fire_action(payload, kb)?;
    }
    Ok(())
}

pub(crate) fn find_rule<'a>(rules: &'a [Rule], name: &str) -> Option<&'a Rule> {
    rules.iter().find(|r| r.name() == name)
}

fn evaluate_rule(
    ruleset_name: &str,
    rule: &Rule,
    fact: &Fact,
    kb: &mut KnowledgeBase,
    results: &mut Vec<RuleResult>,
) -> Outcome {
    let outcome = rule.test_conditions(fact, kb);
    debug!(
        ruleset = ruleset_name,
        rule = rule.name(),
        fact = fact.name(),
        outcome = %outcome,
        "rule evaluated"
    );
    results.push(RuleResult::new(
        ruleset_name,
        rule.name(),
        fact.name(),
        outcome.clone(),
    ));
    outcome
}

fn last_result(results: &[RuleResult], ruleset_name: &str) -> Result<RuleResult, EngineError> {
    results
        .last()
        .cloned()
        .ok_or_else(|| EngineError::EmptyRuleset {
            ruleset: ruleset_name.to_owned(),
        })
}
