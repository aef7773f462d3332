use thiserror::Error;

/// Errors reported by [`OutputStore`](crate::OutputStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Returned when a rule output has no embedded tag type.
    #[error("invalid argument: rule output from '{rule}' has no embedded tag type")]
    InvalidArgument { rule: String },
}
