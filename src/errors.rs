use thiserror::Error;

/// Errors surfaced by the scheduling core.
///
/// Every error aborts the operation that raised it before any counter is
/// mutated, so a caller observes either the full effect of a call or none of
/// it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Lane or movement text that does not match the expected encoding
    /// (`"N1"`, `"N1 -> S2"`).
    #[error("could not parse {0:?}")]
    Parse(String),

    /// The operation referenced a lane or movement outside the registered
    /// universe.
    #[error("identity not found: {0}")]
    IdentityNotFound(String),

    /// The externally supplied setup cannot produce a runnable engine.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Internal inconsistency, e.g. the adaptive strategy was left with no
    /// candidate phase to activate.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
