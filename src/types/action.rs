use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::error::ActionError;
use super::fact::Fact;
use super::knowledge::{KnowledgeBase, Relationship};
use super::value::Value;

/// Side effect run when a [`Rule`](super::Rule) passes.
///
/// `payload` is the fact under evaluation when fired by a run, or whatever
/// the caller hands to [`Ruleset::fire_all_passes`](super::Ruleset::fire_all_passes).
pub trait Action {
    /// Run the action.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the payload does not carry what the
    /// action needs. The error aborts the run that fired the action.
    fn act(&self, payload: Option<&Fact>, kb: &mut KnowledgeBase) -> Result<(), ActionError>;
}

/// An action that does nothing. Rules built without an action get this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAction;

impl Action for NoAction {
    fn act(&self, _payload: Option<&Fact>, _kb: &mut KnowledgeBase) -> Result<(), ActionError> {
        Ok(())
    }
}

/// An action backed by a closure. Build one with [`action_fn`].
pub struct FnAction<F>(F);

/// Wrap a closure as an [`Action`].
///
/// ```
/// use ruleforge::{action_fn, Rule};
///
/// let rule = Rule::new("rule1", action_fn(|_, _| println!("Act1")));
/// ```
pub fn action_fn<F>(f: F) -> FnAction<F>
where
    F: Fn(Option<&Fact>, &mut KnowledgeBase),
{
    FnAction(f)
}

impl<F> Action for FnAction<F>
where
    F: Fn(Option<&Fact>, &mut KnowledgeBase),
{
    fn act(&self, payload: Option<&Fact>, kb: &mut KnowledgeBase) -> Result<(), ActionError> {
        (self.0)(payload, kb);
        Ok(())
    }
}

impl<F> fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnAction")
    }
}

/// Records a fixed piece of knowledge every time it fires.
///
/// The fact `{subject: {attribute: value}}` is built once, up front, and
/// appended to the `subject` memory element on each firing before the
/// callback runs with the payload.
pub struct KnowledgeAction {
    fact: Fact,
    subject: String,
    callback: Box<dyn Fn(Option<&Fact>)>,
}

impl KnowledgeAction {
    pub fn new(
        fact_name: impl Into<String>,
        subject: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<Value>,
        callback: impl Fn(Option<&Fact>) + 'static,
    ) -> Self {
        let subject = subject.into();
        let mut attributes = BTreeMap::new();
        attributes.insert(attribute.into(), value.into());
        let mut data = BTreeMap::new();
        data.insert(subject.clone(), Value::Map(attributes));
        Self {
            fact: Fact::from_data(fact_name, data),
            subject,
            callback: Box::new(callback),
        }
    }

    /// The fact appended on every firing.
    #[must_use]
    pub fn fact(&self) -> &Fact {
        &self.fact
    }
}

impl Action for KnowledgeAction {
    fn act(&self, payload: Option<&Fact>, kb: &mut KnowledgeBase) -> Result<(), ActionError> {
        kb.add_memory_element(self.subject.clone(), self.fact.clone());
        (self.callback)(payload);
        Ok(())
    }
}

impl fmt::Debug for KnowledgeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeAction")
            .field("fact", &self.fact)
            .finish_non_exhaustive()
    }
}

/// Turns the knowledge base's related list into relationships.
///
/// The payload must be a fact with a string `subject` field. For every name
/// on the related list a relationship `subject -> name` is stored under this
/// action's relationship name, then the list is emptied and the callback
/// runs with the payload.
pub struct RelationshipAction {
    name: String,
    description: String,
    callback: Box<dyn Fn(&Fact)>,
}

impl RelationshipAction {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        callback: impl Fn(&Fact) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            callback: Box::new(callback),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Action for RelationshipAction {
    fn act(&self, payload: Option<&Fact>, kb: &mut KnowledgeBase) -> Result<(), ActionError> {
        let fact = payload.ok_or_else(|| ActionError::MissingPayload {
            relationship: self.name.clone(),
        })?;
        let subject = fact
            .subject("subject")
            .and_then(Value::as_str)
            .ok_or_else(|| ActionError::MissingSubject {
                relationship: self.name.clone(),
                fact: fact.name().to_owned(),
            })?;

        let related = kb.take_related();
        debug!(
            relationship = %self.name,
            subject,
            count = related.len(),
            "building relationships"
        );
        for relation in related {
            kb.add_relationship(Relationship::new(
                self.name.clone(),
                self.description.clone(),
                subject,
                relation,
            ));
        }

        (self.callback)(fact);
        Ok(())
    }
}

impl fmt::Debug for RelationshipAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipAction")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
