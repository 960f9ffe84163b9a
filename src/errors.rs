use serde::Serialize;

/// Errors returned to callers of the allocation engine.
///
/// Only caller-input violations surface here: a non-positive requested
/// quantity, a negative quantity somewhere in the snapshot, or an otherwise
/// malformed demand. Shortfalls and advisory conditions are normal outcomes
/// and are reported through `PickResult` fields instead.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum AllocationError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
