
use proptest::prelude::*;
use ruleforge::{Comparator, Fact, KnowledgeBase, Outcome, RuleResult};
use strategies::{arb_chained_ruleset, arb_check, arb_fact, arb_flat_ruleset, GenRuleset};

/// Helper: run a `GenRuleset` against a fact with a fresh knowledge base,
/// returning the result and the full log.
fn run(gen_rs: &GenRuleset, fact: &Fact) -> (RuleResult, Vec<RuleResult>, Vec<String>) {
    let mut ruleset = gen_rs.build();
    let result = ruleset
        .run(fact, &mut KnowledgeBase::new())
        .expect("generated rulesets never error");
    (
        result,
        ruleset.results().to_vec(),
        ruleset.passed_rules().to_vec(),
    )
}

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// The same ruleset + fact must always produce the same result and log.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn determinism_flat(gen_rs in arb_flat_ruleset(), fact in arb_fact()) {
        let first = run(&gen_rs, &fact);
        for _ in 0..3 {
            prop_assert_eq!(&first, &run(&gen_rs, &fact));
        }
    }

    #[test]
    fn determinism_chained(gen_rs in arb_chained_ruleset(), fact in arb_fact()) {
        let first = run(&gen_rs, &fact);
        prop_assert_eq!(&first, &run(&gen_rs, &fact));
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Insertion order
//
// Without redirects, rules are visited in insertion order until the first
// failure; every visited rule but the last passed.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn flat_runs_visit_a_prefix_in_order(gen_rs in arb_flat_ruleset(), fact in arb_fact()) {
        let (result, results, passed) = run(&gen_rs, &fact);
        let names = gen_rs.names();
        let visited: Vec<&str> = results.iter().map(RuleResult::rule_name).collect();

        prop_assert!(!visited.is_empty());
        prop_assert_eq!(&visited[..], &names[..visited.len()]);
        prop_assert_eq!(results.last(), Some(&result));

        let (last, before) = results.split_last().expect("non-empty");
        prop_assert!(before.iter().all(|r| r.outcome().is_pass()));
        if last.outcome().is_pass() {
            prop_assert_eq!(visited.len(), names.len());
            prop_assert_eq!(passed.len(), names.len());
        } else {
            prop_assert_eq!(last.outcome(), &Outcome::Fail);
            prop_assert_eq!(passed.len(), visited.len() - 1);
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Forward-only redirects terminate
//
// Chains that only move forward never trip cycle detection, and every chain
// head that passed is recorded once, in order.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn forward_chains_never_loop(gen_rs in arb_chained_ruleset(), fact in arb_fact()) {
        let (result, results, passed) = run(&gen_rs, &fact);
        prop_assert!(result.outcome().is_terminal());
        prop_assert!(!results.is_empty());

        let names = gen_rs.names();
        prop_assert!(passed.len() <= names.len());
        prop_assert_eq!(&passed[..], &names[..passed.len()]);
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Short-circuiting and comparator duality
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn rule_outcome_is_first_non_pass(
        checks in prop::collection::vec(arb_check(), 0..=4),
        fact in arb_fact(),
    ) {
        let gen_rs = GenRuleset {
            rules: vec![strategies::GenRule { name: "only".into(), checks: checks.clone() }],
        };
        let ruleset = gen_rs.build();
        let rule = ruleset.get_rule("only").expect("rule exists");

        let expected = checks
            .iter()
            .map(|check| check.evaluate(&fact))
            .find(|outcome| !outcome.is_pass())
            .unwrap_or(Outcome::Pass);
        prop_assert_eq!(rule.test_conditions(&fact, &mut KnowledgeBase::new()), expected);
    }

    #[test]
    fn negated_comparators_are_complements(fact in arb_fact(), literal in "[a-z0-9]{0,6}") {
        for attr in ["score", "status", "active"] {
            let eq = fact.has_value("player", attr, Comparator::Equal, &literal);
            let neq = fact.has_value("player", attr, Comparator::NotEqual, &literal);
            prop_assert_ne!(eq, neq, "EQUAL/NOTEQUAL on {}", attr);

            let contains = fact.has_value("player", attr, Comparator::Contains, &literal);
            let not_contains = fact.has_value("player", attr, Comparator::NotContains, &literal);
            prop_assert_ne!(contains, not_contains, "CONTAINS/NOTCONTAINS on {}", attr);
        }
    }

    #[test]
    fn inclusive_orderings_combine_strict_and_equal(fact in arb_fact(), n in -10_i64..=110) {
        let lit = n.to_string();
        let has = |cmp| fact.has_value("player", "score", cmp, &lit);
        prop_assert_eq!(
            has(Comparator::GreaterOrEqual),
            has(Comparator::GreaterThan) || has(Comparator::Equal)
        );
        prop_assert_eq!(
            has(Comparator::LessOrEqual),
            has(Comparator::LessThan) || has(Comparator::Equal)
        );
    }
}
