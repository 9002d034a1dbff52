use std::collections::BTreeMap;

use super::comparator::Comparator;
use super::value::Value;

/// A named tree of `subject -> attribute -> value` data evaluated by a ruleset.
///
/// Facts are assembled once, either from a prepared map or with the
/// dot-path builder, and are read-only afterwards:
///
/// ```
/// use ruleforge::{Comparator, Fact};
///
/// let fact = Fact::new("jack").set("jack.score", 5_i64).set("subject", "jack");
/// assert!(fact.has_attribute("jack", "score"));
/// assert!(fact.has_value("jack", "score", Comparator::LessThan, "10"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fact {
    name: String,
    data: BTreeMap<String, Value>,
}

impl Fact {
    /// Create a fact with no data.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    /// Create a fact from an already-built subject map.
    #[must_use]
    pub fn from_data(name: impl Into<String>, data: BTreeMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Set a value at a dot-separated path. Creates intermediate maps as needed.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        let segments: Vec<&str> = path.split('.').collect();
        Self::insert_recursive(&mut self.data, &segments, value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// Top-level subject keys, in key order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    #[must_use]
    pub fn subject(&self, subject: &str) -> Option<&Value> {
        self.data.get(subject)
    }

    /// The value stored under `subject.attribute`, if the subject is a map
    /// holding that attribute.
    #[must_use]
    pub fn attribute(&self, subject: &str, attribute: &str) -> Option<&Value> {
        self.data.get(subject)?.as_map()?.get(attribute)
    }

    /// Look up any node by dot-separated path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.data.get(first)?, |node, segment| {
            node.as_map()?.get(segment)
        })
    }

    #[must_use]
    pub fn has_subject(&self, subject: &str) -> bool {
        self.data.contains_key(subject)
    }

    #[must_use]
    pub fn has_attribute(&self, subject: &str, attribute: &str) -> bool {
        self.attribute(subject, attribute).is_some()
    }

    /// Compare `subject.attribute` against `literal`.
    ///
    /// Returns `false` for every comparator when the subject or attribute is
    /// missing. See [`Value::compare`] for the per-type semantics.
    #[must_use]
    pub fn has_value(
        &self,
        subject: &str,
        attribute: &str,
        comparator: Comparator,
        literal: &str,
    ) -> bool {
        self.attribute(subject, attribute)
            .is_some_and(|value| value.compare(comparator, literal))
    }

    fn insert_recursive(map: &mut BTreeMap<String, Value>, segments: &[&str], value: Value) {
        match segments {
            [] => {}
            [last] => {
                map.insert((*last).to_owned(), value);
            }
            [first, rest @ ..] => {
                let entry = map
                    .entry((*first).to_owned())
                    .or_insert_with(|| Value::Map(BTreeMap::new()));
                match entry {
                    Value::Map(nested) => {
                        Self::insert_recursive(nested, rest, value);
                    }
                    _ => {
                        let mut nested = BTreeMap::new();
                        Self::insert_recursive(&mut nested, rest, value);
                        *entry = Value::Map(nested);
                    }
                }
            }
        }
    }
}
