use thiserror::Error;

use crate::parse::ParseError;
use crate::EngineError;

/// Unified error type covering parsing, evaluation, and I/O.
///
/// Returned by convenience methods like [`Ruleset::from_dsl()`](crate::Ruleset::from_dsl)
/// and [`Ruleset::from_file()`](crate::Ruleset::from_file).
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
