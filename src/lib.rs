//! Forward-chaining rule evaluation.
//!
//! A [`Ruleset`] holds ordered [`Rule`]s, each an ordered list of
//! [`Condition`]s guarding one [`Action`]. Running a ruleset against a
//! [`Fact`] tests every rule in turn; a condition may redirect evaluation to
//! another rule, and chains that end in [`Outcome::Pass`] fire their head
//! rule's action. Conditions and actions share a [`KnowledgeBase`] that
//! accumulates facts and relationships across runs.
//!
//! ```
//! use ruleforge::{Comparator, Fact, KnowledgeBase, Outcome, RulesetBuilder, StandardCondition};
//!
//! let mut ruleset = RulesetBuilder::new("guard")
//!     .rule("is_jack", |r| {
//!         r.standard(
//!             "named_jack",
//!             StandardCondition::new("person", "name", Comparator::Equal, "jack"),
//!         )
//!     })
//!     .build()
//!     .unwrap();
//!
//! let jack = Fact::new("jack").set("person.name", "jack");
//! let result = ruleset.run(&jack, &mut KnowledgeBase::new()).unwrap();
//! assert_eq!(result.outcome(), &Outcome::Pass);
//! ```

mod error;
mod evaluate;
mod forge;
pub mod parse;
mod types;

pub use error::ForgeError;
pub use forge::RuleForge;
pub use types::{
    action_fn, Action, ActionError, Comparator, Condition, ConditionFn, EngineError, Fact,
    FnAction, KnowledgeAction, KnowledgeBase, NoAction, Outcome, Relationship, RelationshipAction,
    Rule, RuleBuilder, RuleResult, Ruleset, RulesetBuilder, RunOptions, RunReport,
    StandardCondition, UnknownComparator, Value,
};
