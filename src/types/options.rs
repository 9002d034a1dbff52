/// Switches controlling a single [`Ruleset::run_rules`](super::Ruleset::run_rules) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunOptions {
    /// Fire a rule's action as soon as its chain passes. Defaults to `true`.
    pub fire_on_pass: bool,
    /// Report a redirect cycle as an ordinary `FAIL` instead of an
    /// [`EngineError::InfiniteLoop`](super::EngineError::InfiniteLoop).
    /// Defaults to `false`.
    pub fail_on_infinite: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fire_on_pass: true,
            fail_on_infinite: false,
        }
    }
}

impl RunOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fire_on_pass(mut self, fire: bool) -> Self {
        self.fire_on_pass = fire;
        self
    }

    #[must_use]
    pub fn fail_on_infinite(mut self, fail: bool) -> Self {
        self.fail_on_infinite = fail;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = RunOptions::default();
        assert!(opts.fire_on_pass);
        assert!(!opts.fail_on_infinite);
    }

    #[test]
    fn builder_setters() {
        let opts = RunOptions::new().fire_on_pass(false).fail_on_infinite(true);
        assert_eq!(
            opts,
            RunOptions {
                fire_on_pass: false,
                fail_on_infinite: true,
            }
        );
    }
}
