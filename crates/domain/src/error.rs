//! Domain error kinds surfaced by the use-case services.

use thiserror::Error;

/// Error returned by every use-case operation.
///
/// Controllers only look at the variant; the payload is a human-readable
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Client-correctable input problem.
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage or infrastructure failure, including an exceeded deadline.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation(msg)
            | DomainError::Conflict(msg)
            | DomainError::NotFound(msg)
            | DomainError::Internal(msg) => msg,
        }
    }
}
