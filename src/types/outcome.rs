use std::fmt;

/// The result of testing a rule's conditions against a fact.
///
/// A [`Redirect`](Outcome::Redirect) hands evaluation over to the named rule
/// of the same ruleset; the other three variants end a chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", from = "String"))]
pub enum Outcome {
    Pass,
    Fail,
    Error,
    Redirect(String),
}

impl Outcome {
    /// Redirect evaluation to the rule called `rule_name`.
    pub fn redirect(rule_name: impl Into<String>) -> Self {
        Outcome::Redirect(rule_name.into())
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    /// True for every outcome except a redirect.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Redirect(_))
    }

    /// The target rule name when this outcome is a redirect.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Outcome::Redirect(name) => Some(name),
            _ => None,
        }
    }

    /// The string form used in result records: `PASS`, `FAIL`, `ERROR` or the
    /// redirect target.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::Error => "ERROR",
            Outcome::Redirect(name) => name,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Outcome {
    fn from(s: &str) -> Self {
        match s {
            "PASS" => Outcome::Pass,
            "FAIL" => Outcome::Fail,
            "ERROR" => Outcome::Error,
            other => Outcome::Redirect(other.to_owned()),
        }
    }
}

impl From<String> for Outcome {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PASS" | "FAIL" | "ERROR" => Outcome::from(s.as_str()),
            _ => Outcome::Redirect(s),
        }
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Redirect(name) => name,
            other => other.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_sentinels() {
        assert_eq!(Outcome::Pass.to_string(), "PASS");
        assert_eq!(Outcome::Fail.to_string(), "FAIL");
        assert_eq!(Outcome::Error.to_string(), "ERROR");
        assert_eq!(Outcome::redirect("rule2").to_string(), "rule2");
    }

    #[test]
    fn from_string_form() {
        assert_eq!(Outcome::from("PASS"), Outcome::Pass);
        assert_eq!(Outcome::from("ERROR"), Outcome::Error);
        assert_eq!(Outcome::from("rule2".to_owned()), Outcome::redirect("rule2"));
        assert_eq!(String::from(Outcome::Fail), "FAIL");
    }

    #[test]
    fn redirect_accessors() {
        let o = Outcome::redirect("next");
        assert!(!o.is_terminal());
        assert!(!o.is_pass());
        assert_eq!(o.redirect_target(), Some("next"));
        assert_eq!(Outcome::Pass.redirect_target(), None);
        assert!(Outcome::Fail.is_terminal());
    }
}
