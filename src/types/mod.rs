mod action;
mod comparator;
mod condition;
mod error;
mod fact;
mod knowledge;
mod options;
mod outcome;
mod result;
mod rule;
mod ruleset;
mod run_report;
mod value;

pub use action::{action_fn, Action, FnAction, KnowledgeAction, NoAction, RelationshipAction};
pub use comparator::Comparator;
pub use condition::{Condition, ConditionFn, StandardCondition};
pub use error::{ActionError, EngineError, UnknownComparator};
pub use fact::Fact;
pub use knowledge::{KnowledgeBase, Relationship};
pub use options::RunOptions;
pub use outcome::Outcome;
pub use result::RuleResult;
pub use rule::Rule;
pub use ruleset::{RuleBuilder, Ruleset, RulesetBuilder};
pub use run_report::RunReport;
pub use value::Value;
