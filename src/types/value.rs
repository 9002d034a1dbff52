use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::comparator::Comparator;

/// A node in a [`Fact`](super::Fact) data tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Absence of a value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A nested map of named values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// True for [`Value::Int`] and [`Value::Float`].
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Render the value the way a comparison literal is written: strings are
    /// unquoted and list items are joined with commas.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::String(v) => v.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::to_literal)
                .collect::<Vec<_>>()
                .join(","),
            Value::Map(_) => self.to_string(),
        }
    }

    /// Compare this value against a string literal.
    ///
    /// Numeric values are compared against the literal's leading integer;
    /// every other value is compared by its literal rendering. Ordering
    /// comparators only hold for numeric values.
    #[must_use]
    pub fn compare(&self, comparator: Comparator, literal: &str) -> bool {
        if self.is_numeric() {
            let ord = parse_int_literal(literal).and_then(|n| self.numeric_cmp(n));
            return match comparator {
                Comparator::Equal => ord == Some(Ordering::Equal),
                // Negation of EQUAL rather than a copy of it.
                Comparator::NotEqual => ord != Some(Ordering::Equal),
                Comparator::Contains => false,
                Comparator::NotContains => true,
                Comparator::GreaterThan => ord == Some(Ordering::Greater),
                Comparator::LessThan => ord == Some(Ordering::Less),
                Comparator::GreaterOrEqual => {
                    matches!(ord, Some(Ordering::Greater | Ordering::Equal))
                }
                Comparator::LessOrEqual => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            };
        }

        match comparator {
            Comparator::Equal => self.to_literal() == literal,
            Comparator::NotEqual => self.to_literal() != literal,
            Comparator::Contains => self.contains_literal(literal),
            Comparator::NotContains => !self.contains_literal(literal),
            Comparator::GreaterThan
            | Comparator::LessThan
            | Comparator::GreaterOrEqual
            | Comparator::LessOrEqual => false,
        }
    }

    /// Whether a list element or map value matches `literal`.
    /// Scalars are not containers and never contain anything.
    fn contains_literal(&self, literal: &str) -> bool {
        match self {
            Value::List(items) => items.iter().any(|item| item.matches_literal(literal)),
            Value::Map(map) => map.values().any(|item| item.matches_literal(literal)),
            _ => false,
        }
    }

    fn matches_literal(&self, literal: &str) -> bool {
        if self.is_numeric() {
            parse_int_literal(literal).and_then(|n| self.numeric_cmp(n)) == Some(Ordering::Equal)
        } else {
            self.to_literal() == literal
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn numeric_cmp(&self, n: i128) -> Option<Ordering> {
        match self {
            Value::Int(v) => Some(i128::from(*v).cmp(&n)),
            Value::Float(v) => v.partial_cmp(&(n as f64)),
            _ => None,
        }
    }
}

/// Parse the leading, optionally signed, integer of a literal.
///
/// `"5.9"` yields 5 and `"12abc"` yields 12; a literal with no leading digits
/// yields `None`. Prefixes too long for `i128` saturate toward their sign, so
/// they still order against every `i64` value.
pub(crate) fn parse_int_literal(literal: &str) -> Option<i128> {
    let s = literal.trim_start();
    let sign_len = usize::from(s.starts_with(['-', '+']));
    let digits = s[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len() - sign_len);
    if digits == 0 {
        return None;
    }
    let prefix = &s[..sign_len + digits];
    match prefix.parse::<i128>() {
        Ok(n) => Some(n),
        Err(_) if prefix.starts_with('-') => Some(i128::MIN),
        Err(_) => Some(i128::MAX),
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
