use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use ruleforge::{
    Comparator, Fact, KnowledgeAction, KnowledgeBase, Outcome, Relationship, RelationshipAction,
    RuleBuilder, Ruleset, RulesetBuilder, Value,
};
use tracing_subscriber::filter::LevelFilter;

// -- Relative ranking -------------------------------------------------------

/// Stores every scored fact under `scores` and marks each earlier fact with a
/// lower score as related. Passing chains record `better` relationships.
fn ranking(announced: &Rc<RefCell<Vec<String>>>) -> Ruleset {
    let announced = Rc::clone(announced);
    RulesetBuilder::new("ruleset1")
        .rule("amibetter", |r| {
            r.condition("isbetter", |fact, kb| {
                let score = fact.attribute(fact.name(), "score").and_then(Value::as_i64);
                let Some(score) = score else {
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
                move |fact| {
                    if let Some(subject) = fact.subject("subject").and_then(Value::as_str) {
                        announced.borrow_mut().push(format!("{subject} is better"));
                    }
                },
            ))
        })
        .build()
        .unwrap()
}

fn player(name: &str, score: i64) -> Fact {
    Fact::new(name)
        .set(&format!("{name}.score"), score)
        .set("subject", name)
}

#[test]
fn first_score_is_not_better_than_anyone() {
    let announced = Rc::new(RefCell::new(Vec::new()));
    let mut ruleset = ranking(&announced);
    let mut kb = KnowledgeBase::new();

    let result = ruleset.run(&player("jack", 5), &mut kb).unwrap();

    assert_eq!(result.outcome(), &Outcome::Fail);
    assert_eq!(kb.get_memory_element("scores").len(), 1);
    assert!(!kb.has_relationship("better"));
    assert!(announced.borrow().is_empty());
}

#[test]
fn higher_score_records_better_relationship() {
    let announced = Rc::new(RefCell::new(Vec::new()));
    let mut ruleset = ranking(&announced);
    let mut kb = KnowledgeBase::new();

    ruleset.run(&player("jack", 5), &mut kb).unwrap();
    let result = ruleset.run(&player("jill", 10), &mut kb).unwrap();

    assert_eq!(result.outcome(), &Outcome::Pass);
    assert_eq!(result.fact_name(), "jill");
    let better = kb.get_relationships("better");
    assert_eq!(better.len(), 1);
    assert_eq!(better[0].subject(), "jill");
    assert_eq!(better[0].relation(), "jack");
    assert_eq!(better[0].description(), "x is better than y");
    assert!(kb.related().is_empty());
    assert_eq!(*announced.borrow(), ["jill is better"]);
}

#[test]
fn relationship_name_keeps_its_first_edge() {
    let announced = Rc::new(RefCell::new(Vec::new()));
    let mut ruleset = ranking(&announced);
    let mut kb = KnowledgeBase::new();

    ruleset.run(&player("jack", 5), &mut kb).unwrap();
    ruleset.run(&player("jill", 10), &mut kb).unwrap();
    ruleset.run(&player("joe", 20), &mut kb).unwrap();

    let better = kb.get_relationships("better");
    assert_eq!(better.len(), 1);
    assert_eq!(better[0].to_string(), "jill -[better]-> jack");
    assert_eq!(kb.get_memory_element("scores").len(), 3);
    assert_eq!(announced.borrow().len(), 2);
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Log output emitted at `level` or above while a duplicate relationship is
/// written.
fn log_of_duplicate_write(level: LevelFilter) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let mut kb = KnowledgeBase::new();
    kb.add_relationship(Relationship::new("better", "", "jill", "jack"));
    tracing::subscriber::with_default(subscriber, || {
        assert!(!kb.add_relationship(Relationship::new("better", "", "joe", "jill")));
    });

    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn ignored_relationship_is_not_a_warning() {
    assert_eq!(log_of_duplicate_write(LevelFilter::WARN), "");
    assert!(log_of_duplicate_write(LevelFilter::DEBUG).contains("relationship already recorded"));
}

// -- Team roster ------------------------------------------------------------

fn anyone_plays(fact: &Fact, position: &str) -> bool {
    fact.data().values().any(|player| {
        player
            .as_map()
            .and_then(|attrs| attrs.get(position))
            .and_then(Value::as_bool)
            == Some(true)
    })
}

/// A rule that passes when any player on the roster can play `position`.
fn position_rule(
    position: &'static str,
    fact_name: &str,
) -> impl FnOnce(RuleBuilder) -> RuleBuilder {
    let fact_name = fact_name.to_owned();
    move |r| {
        r.condition("find", move |fact, _| {
            if anyone_plays(fact, position) {
                Outcome::Pass
            } else {
                Outcome::Fail
            }
        })
        .action(KnowledgeAction::new(fact_name, "team", position, true, |_| {}))
    }
}

fn team_ruleset() -> Ruleset {
    RulesetBuilder::new("firstRS")
        .rule("goalkeeper", position_rule("goalkeeper", "teamhasagoalkeeper"))
        .rule("defender", position_rule("defender", "teamhasadefender"))
        .rule("midfielder", |r| {
            r.condition("findMidfielder", |fact, kb| {
                let mut found = false;
                for (name, player) in fact.data() {
                    let plays = player
                        .as_map()
                        .and_then(|attrs| attrs.get("midfielder"))
                        .and_then(Value::as_bool)
                        == Some(true);
                    if plays {
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
                |_| {},
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
                |_| {},
            ))
        })
        .rule("attacker", position_rule("attacker", "teamhasanattacker"))
        .rule("fullteam", |r| {
            r.condition("findFullTeam", |_, kb| {
                let team = kb.get_memory_element("team");
                let has = |attr: &str| {
                    team.iter()
                        .any(|f| f.has_value("team", attr, Comparator::Equal, "true"))
                };
                if ["goalkeeper", "defender", "midfielder", "2ndmidfielder", "attacker"]
                    .into_iter()
                    .all(has)
                {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                }
            })
            .action(KnowledgeAction::new("team is full", "team", "fullteam", true, |_| {}))
        })
        .build()
        .unwrap()
}

fn roster() -> Fact {
    let mut fact = Fact::new("roster");
    for (name, gk, def, mid, att) in [
        ("dave", false, false, false, true),
        ("paul", true, false, false, false),
        ("isabel", false, true, true, false),
        ("elizabeth", false, true, true, false),
        ("patricia", false, true, true, false),
    ] {
        fact = fact
            .set(&format!("{name}.goalkeeper"), gk)
            .set(&format!("{name}.defender"), def)
            .set(&format!("{name}.midfielder"), mid)
            .set(&format!("{name}.attacker"), att);
    }
    fact
}

#[test]
fn full_roster_builds_team_knowledge() {
    let mut ruleset = team_ruleset();
    let mut kb = KnowledgeBase::new();

    let result = ruleset.run(&roster(), &mut kb).unwrap();

    assert_eq!(result.rule_name(), "fullteam");
    assert_eq!(result.outcome(), &Outcome::Pass);
    let team: Vec<&str> = kb.get_memory_element("team").iter().map(Fact::name).collect();
    assert_eq!(
        team,
        [
            "teamhasagoalkeeper",
            "teamhasadefender",
            "teamhasamidfielder",
            "teamhastwomidfielders",
            "teamhasanattacker",
            "team is full",
        ]
    );
    assert_eq!(kb.get_memory_element("midfielder").len(), 3);
}

#[test]
fn roster_without_goalkeeper_stops_at_first_rule() {
    let mut ruleset = team_ruleset();
    let mut kb = KnowledgeBase::new();
    let fact = Fact::new("roster").set("dave.attacker", true);

    let result = ruleset.run(&fact, &mut kb).unwrap();

    assert_eq!(result.rule_name(), "goalkeeper");
    assert_eq!(result.outcome(), &Outcome::Fail);
    assert!(!kb.has_memory_element("team"));
}

// -- Store behavior ---------------------------------------------------------

#[test]
fn memory_elements_accumulate_in_order() {
    let mut kb = KnowledgeBase::new();
    for name in ["a", "b", "c"] {
        kb.add_memory_element("log", Fact::new(name));
    }
    let names: Vec<&str> = kb.get_memory_element("log").iter().map(Fact::name).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert!(kb.get_memory_element("missing").is_empty());
}

#[test]
fn memory_elements_by_fact_follow_subject_keys() {
    let mut kb = KnowledgeBase::new();
    kb.add_memory_element("jack", Fact::new("j1"));
    kb.add_memory_element("jill", Fact::new("j2"));
    kb.add_memory_element("other", Fact::new("x"));

    let probe = Fact::new("probe").set("jill.score", 1).set("jack.score", 2);
    let names: Vec<&str> = kb
        .get_memory_elements_by_fact(&probe)
        .into_iter()
        .map(Fact::name)
        .collect();
    assert_eq!(names, ["j1", "j2"]);
}

#[test]
fn related_list_is_caller_managed() {
    let mut kb = KnowledgeBase::new();
    kb.add_to_related("jack");
    kb.add_to_related("jill");
    assert_eq!(kb.related(), ["jack", "jill"]);
    assert_eq!(kb.related(), ["jack", "jill"]);
    kb.clear_related();
    assert!(kb.related().is_empty());
}
