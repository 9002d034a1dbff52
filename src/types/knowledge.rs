use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::fact::Fact;

/// A named edge recording that `subject` relates to `relation`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    name: String,
    description: String,
    subject: String,
    relation: String,
}

impl Relationship {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        subject: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            subject: subject.into(),
            relation: relation.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn relation(&self) -> &str {
        &self.relation
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.subject, self.name, self.relation)
    }
}

/// Memory shared by every rule that runs against it.
///
/// Holds three stores:
/// - memory elements: an append-only log of facts per subject name;
/// - relationships: derived edges keyed by relationship name;
/// - the related list: scratch names a condition stages for its paired
///   action. Nothing clears it except [`clear_related`](Self::clear_related)
///   and actions that consume it.
///
/// Nothing is ever evicted. The knowledge base lives as long as its owner
/// keeps it; start over by constructing a new one.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    memory_elements: HashMap<String, Vec<Fact>>,
    relationships: HashMap<String, Vec<Relationship>>,
    related: Vec<String>,
}

impl KnowledgeBase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fact` to the log kept for `subject`.
    pub fn add_memory_element(&mut self, subject: impl Into<String>, fact: Fact) {
        let subject = subject.into();
        trace!(subject = %subject, fact = fact.name(), "memory element added");
        self.memory_elements.entry(subject).or_default().push(fact);
    }

    /// The facts logged for `subject`, oldest first. Empty when nothing was logged.
    #[must_use]
    pub fn get_memory_element(&self, subject: &str) -> &[Fact] {
        self.memory_elements
            .get(subject)
            .map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn has_memory_element(&self, subject: &str) -> bool {
        self.memory_elements.contains_key(subject)
    }

    /// Drop the whole log for `subject`, returning it.
    pub fn remove_memory_element(&mut self, subject: &str) -> Option<Vec<Fact>> {
        self.memory_elements.remove(subject)
    }

    /// Every fact logged under any subject key of `fact`, grouped by subject
    /// in the fact's key order.
    #[must_use]
    pub fn get_memory_elements_by_fact(&self, fact: &Fact) -> Vec<&Fact> {
        fact.subjects()
            .flat_map(|subject| self.get_memory_element(subject))
            .collect()
    }

    /// Store `relationship` under its name.
    ///
    /// Only the first relationship stored under a name is kept: when the name
    /// already has an entry this is a no-op and returns `false`.
    pub fn add_relationship(&mut self, relationship: Relationship) -> bool {
        let entries = self
            .relationships
            .entry(relationship.name.clone())
            .or_default();
        if !entries.is_empty() {
            debug!(
                relationship = relationship.name(),
                subject = relationship.subject(),
                relation = relationship.relation(),
                "relationship already recorded, ignoring"
            );
            return false;
        }
        trace!(%relationship, "relationship added");
        entries.push(relationship);
        true
    }

    #[must_use]
    pub fn get_relationships(&self, name: &str) -> &[Relationship] {
        self.relationships
            .get(name)
            .map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn has_relationship(&self, name: &str) -> bool {
        self.relationships
            .get(name)
            .is_some_and(|entries| !entries.is_empty())
    }

    pub fn remove_relationship(&mut self, name: &str) -> Option<Vec<Relationship>> {
        self.relationships.remove(name)
    }

    pub fn add_to_related(&mut self, name: impl Into<String>) {
        self.related.push(name.into());
    }

    pub fn clear_related(&mut self) {
        self.related.clear();
    }

    #[must_use]
    pub fn related(&self) -> &[String] {
        &self.related
    }

    /// Empty the related list, returning what it held.
    pub fn take_related(&mut self) -> Vec<String> {
        std::mem::take(&mut self.related)
    }
}
