use ruleforge::{
    Comparator, Fact, KnowledgeAction, KnowledgeBase, Outcome, RuleBuilder, RulesetBuilder, Value,
};

fn plays(player: &Value, position: &str) -> bool {
    player
        .as_map()
        .and_then(|attrs| attrs.get(position))
        .and_then(Value::as_bool)
        == Some(true)
}

/// Pass when anyone on the roster plays `position`, then note it under `team`.
fn position_rule(
    position: &'static str,
    found: &'static str,
) -> impl FnOnce(RuleBuilder) -> RuleBuilder {
    move |r| {
        r.condition("find", move |fact, _| {
            if fact.data().values().any(|player| plays(player, position)) {
                Outcome::Pass
            } else {
                Outcome::Fail
            }
        })
        .action(KnowledgeAction::new(found, "team", position, true, move |_| {
            println!("found a {position}");
        }))
    }
}

fn main() {
    let mut ruleset = RulesetBuilder::new("firstRS")
        .rule("goalkeeper", position_rule("goalkeeper", "teamhasagoalkeeper"))
        .rule("defender", position_rule("defender", "teamhasadefender"))
        .rule("midfielder", |r| {
            r.condition("findMidfielder", |fact, kb| {
                let mut found = false;
                for (name, player) in fact.data() {
                    if plays(player, "midfielder") {
                        // Counted by the next rule.
                        kb.add_memory_element(
                            "midfielder",
                            Fact::new("midfielder").set("midfielder.name", name.as_str()),
                        );
                        found = true;
                    }
                }
                if found {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                }
            })
            .action(KnowledgeAction::new(
                "teamhasamidfielder",
                "team",
                "midfielder",
                true,
                |_| println!("found a midfielder"),
            ))
        })
        .rule("2ndmidfielder", |r| {
            r.condition("find2ndMidfielder", |_, kb| {
                if kb.get_memory_element("midfielder").len() > 1 {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                }
            })
            .action(KnowledgeAction::new(
                "teamhastwomidfielders",
                "team",
                "2ndmidfielder",
                true,
                |_| println!("found another midfielder"),
            ))
        })
        .rule("attacker", position_rule("attacker", "teamhasanattacker"))
        .rule("fullteam", |r| {
            r.condition("findFullTeam", |_, kb| {
                let team = kb.get_memory_element("team");
                let needed = ["goalkeeper", "defender", "midfielder", "2ndmidfielder", "attacker"];
                let all_found = needed.into_iter().all(|attr| {
                    team.iter()
                        .any(|f| f.has_value("team", attr, Comparator::Equal, "true"))
                });
                if all_found {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                }
            })
            .action(KnowledgeAction::new(
                "team is full",
                "team",
                "fullteam",
                true,
                |_| println!("we have a full team!"),
            ))
        })
        .build()
        .expect("failed to build ruleset");

    let mut roster = Fact::new("roster");
    for (name, gk, def, mid, att) in [
        ("dave", false, false, false, true),
        ("paul", true, false, false, false),
        ("isabel", false, true, true, false),
        ("elizabeth", false, true, true, false),
        ("patricia", false, true, true, false),
    ] {
        roster = roster
            .set(&format!("{name}.goalkeeper"), gk)
            .set(&format!("{name}.defender"), def)
            .set(&format!("{name}.midfielder"), mid)
            .set(&format!("{name}.attacker"), att);
    }

    let mut kb = KnowledgeBase::new();
    let result = ruleset.run(&roster, &mut kb).expect("run failed");
    println!("{result}");
    for fact in kb.get_memory_element("team") {
        println!("  {}", fact.name());
    }
}
