use ruleforge::{action_fn, Fact, KnowledgeBase, Ruleset};

fn main() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/rules.forge");
    let mut ruleset = Ruleset::from_file(path).expect("failed to load rules");

    ruleset
        .get_rule_mut("rule1")
        .expect("rule1 is defined")
        .set_action(action_fn(|payload, _| {
            if let Some(fact) = payload {
                println!("rule1 passed for {}", fact.name());
            }
        }));

    println!("{ruleset}");

    let fact = Fact::new("fact1")
        .set("subject1.attribute1", "value1")
        .set("subject1.score", 5_i64)
        .set("subject2.attribute3", "passme");

    let result = ruleset
        .run(&fact, &mut KnowledgeBase::new())
        .expect("run failed");
    println!("Result: {result}");
}
