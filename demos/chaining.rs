use ruleforge::{
    action_fn, Comparator, Fact, KnowledgeBase, RulesetBuilder, RunOptions, StandardCondition,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut ruleset = RulesetBuilder::new("Example")
        .rule("rule1", |r| {
            r.standard(
                "cond1",
                StandardCondition::new("subject1", "attribute1", Comparator::Equal, "value1"),
            )
            .standard(
                "cond2",
                StandardCondition::new("subject1", "score", Comparator::GreaterThan, "3")
                    .on_pass("rule2".into()),
            )
            .action(action_fn(|_, _| println!("Act1")))
        })
        .rule("rule2", |r| {
            r.standard(
                "cond3",
                StandardCondition::new("subject2", "attribute3", Comparator::Equal, "failme")
                    .on_pass("FAIL".into())
                    .on_fail("PASS".into()),
            )
            .action(action_fn(|_, _| println!("Act2")))
        })
        .build()
        .expect("failed to build ruleset");

    let mut kb = KnowledgeBase::new();
    for attribute3 in ["passme", "failme"] {
        let fact = Fact::new(format!("fact-{attribute3}"))
            .set("subject1.attribute1", "value1")
            .set("subject1.score", 5_i64)
            .set("subject2.attribute3", attribute3);

        let report = ruleset
            .run_rules_detailed(&fact, &mut kb, RunOptions::default())
            .expect("run failed");
        println!("{report}");
        for entry in report.results() {
            println!("  {entry}");
        }
    }
}
