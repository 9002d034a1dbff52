use ruleforge::{Fact, Outcome, RelationshipAction, RuleForge, RulesetBuilder, RunOptions, Value};

fn player(name: &str, score: i64) -> Fact {
    Fact::new(name)
        .set(&format!("{name}.score"), score)
        .set("subject", name)
}

fn main() {
    let ruleset = RulesetBuilder::new("ruleset1")
        .rule("amibetter", |r| {
            r.condition("isbetter", |fact, kb| {
                let own = fact.attribute(fact.name(), "score").and_then(Value::as_i64);
                let Some(score) = own else {
                    return Outcome::Fail;
                };
                kb.add_memory_element("scores", fact.clone());

                let beaten: Vec<String> = kb
                    .get_memory_element("scores")
                    .iter()
                    .filter(|other| other.name() != fact.name())
                    .filter(|other| {
                        other
                            .attribute(other.name(), "score")
                            .and_then(Value::as_i64)
                            .is_some_and(|theirs| theirs < score)
                    })
                    .map(|other| other.name().to_owned())
                    .collect();

                if beaten.is_empty() {
                    return Outcome::Fail;
                }
                for name in beaten {
                    kb.add_to_related(name);
                }
                Outcome::Pass
            })
            .action(RelationshipAction::new(
                "better",
                "x is better than y",
                |fact| {
                    if let Some(subject) = fact.subject("subject").and_then(Value::as_str) {
                        println!("{subject} is better");
                    }
                },
            ))
        })
        .build()
        .expect("failed to build ruleset");

    let mut forge = RuleForge::new();
    forge.add_ruleset(ruleset);
    forge.add_fact(player("jack", 5));
    forge.add_fact(player("jill", 10));

    let results = forge
        .run_bulk("ruleset1", RunOptions::default())
        .expect("bulk run failed");
    for result in &results {
        println!("{result}");
    }

    for relationship in forge.knowledge_base().get_relationships("better") {
        println!("{relationship} ({})", relationship.description());
    }
}
