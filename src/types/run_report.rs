use std::fmt;
use std::time::Duration;

use super::result::RuleResult;

/// Detailed record of one run, returned by
/// [`Ruleset::run_rules_detailed()`](super::ruleset::Ruleset::run_rules_detailed).
///
/// Contains the result the run returned, every result it logged, the rules
/// whose chains passed and the wall-clock duration of the run.
#[derive(Debug, Clone)]
#[must_use]
pub struct RunReport {
    result: RuleResult,
    results: Vec<RuleResult>,
    passed: Vec<String>,
    duration: Duration,
}

impl RunReport {
    pub(crate) fn new(
        result: RuleResult,
        results: Vec<RuleResult>,
        passed: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            result,
            results,
            passed,
            duration,
        }
    }

    /// The result [`Ruleset::run_rules()`](super::ruleset::Ruleset::run_rules) returns.
    pub fn result(&self) -> &RuleResult {
        &self.result
    }

    /// Every result logged by the run, redirect hops included.
    #[must_use]
    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    /// Names of the rules whose chains passed, in the order they passed.
    #[must_use]
    pub fn passed(&self) -> &[String] {
        &self.passed
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "result: {}", self.result)?;
        write!(f, ", passed: [{}]", self.passed.join(", "))?;
        write!(f, ", visited: {}", self.results.len())?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Outcome;

    #[test]
    fn report_accessors() {
        let last = RuleResult::new("rs", "r2", "f", Outcome::Pass);
        let report = RunReport::new(
            last.clone(),
            vec![
                RuleResult::new("rs", "r1", "f", Outcome::redirect("r2")),
                last.clone(),
            ],
            vec!["r1".into()],
            Duration::from_nanos(500),
        );

        assert_eq!(report.result(), &last);
        assert_eq!(report.results().len(), 2);
        assert_eq!(report.passed(), &["r1"]);
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn report_display() {
        let report = RunReport::new(
            RuleResult::new("rs", "r1", "f", Outcome::Fail),
            vec![RuleResult::new("rs", "r1", "f", Outcome::Fail)],
            vec![],
            Duration::from_nanos(100),
        );
        let s = report.to_string();
        assert!(s.contains("result: rs/r1 on 'f' = FAIL"));
        assert!(s.contains("passed: []"));
        assert!(s.contains("visited: 1"));
    }
}
