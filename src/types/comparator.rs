use std::fmt;
use std::str::FromStr;

use super::error::UnknownComparator;

/// Comparison operators accepted by [`Fact::has_value`](super::Fact::has_value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Comparator {
    Equal,
    NotEqual,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparator {
    pub const ALL: [Comparator; 8] = [
        Comparator::Equal,
        Comparator::NotEqual,
        Comparator::Contains,
        Comparator::NotContains,
        Comparator::GreaterThan,
        Comparator::LessThan,
        Comparator::GreaterOrEqual,
        Comparator::LessOrEqual,
    ];

    /// The upper-case keyword for this comparator, e.g. `GREATEROREQUAL`.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Comparator::Equal => "EQUAL",
            Comparator::NotEqual => "NOTEQUAL",
            Comparator::Contains => "CONTAINS",
            Comparator::NotContains => "NOTCONTAINS",
            Comparator::GreaterThan => "GREATERTHAN",
            Comparator::LessThan => "LESSTHAN",
            Comparator::GreaterOrEqual => "GREATEROREQUAL",
            Comparator::LessOrEqual => "LESSOREQUAL",
        }
    }

    /// Whether the comparator orders numbers and never holds for other values.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Comparator::GreaterThan
                | Comparator::LessThan
                | Comparator::GreaterOrEqual
                | Comparator::LessOrEqual
        )
    }
}

impl FromStr for Comparator {
    type Err = UnknownComparator;

    /// Accepts keywords in any case as well as the symbolic forms
    /// `==`, `!=`, `>`, `<`, `>=`, `<=` and `!contains`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => return Ok(Comparator::Equal),
            "!=" => return Ok(Comparator::NotEqual),
            ">" => return Ok(Comparator::GreaterThan),
            "<" => return Ok(Comparator::LessThan),
            ">=" => return Ok(Comparator::GreaterOrEqual),
            "<=" => return Ok(Comparator::LessOrEqual),
            _ => {}
        }
        if s.eq_ignore_ascii_case("!contains") {
            return Ok(Comparator::NotContains);
        }
        Comparator::ALL
            .into_iter()
            .find(|c| c.keyword().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownComparator(s.to_owned()))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
