use ruleforge::{Comparator, Fact, KnowledgeBase, Outcome, RulesetBuilder, StandardCondition};

fn main() {
    // Define rules
    let mut ruleset = RulesetBuilder::new("eligibility")
        .rule("eligible_age", |r| {
            r.standard(
                "adult",
                StandardCondition::new("user", "age", Comparator::GreaterOrEqual, "18"),
            )
        })
        .rule("active_account", |r| {
            r.standard(
                "active",
                StandardCondition::new("user", "status", Comparator::Equal, "active"),
            )
        })
        .build()
        .expect("failed to build ruleset");

    println!("{ruleset}");

    // Run against a fact
    let fact = Fact::new("alice")
        .set("user.age", 25_i64)
        .set("user.status", "active");
    let mut kb = KnowledgeBase::new();

    let result = ruleset.run(&fact, &mut kb).expect("run failed");
    match result.outcome() {
        Outcome::Pass => println!("Every rule passed: {result}"),
        _ => println!("Stopped at: {result}"),
    }
}
