//! Domain error types.

use thiserror::Error;

/// Errors raised when a payload violates a model invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A required text field was empty.
    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// A quantity or amount was negative.
    #[error("Field '{field}' must not be negative, got {value}")]
    Negative { field: &'static str, value: String },

    /// A computed amount does not fit in a decimal.
    #[error("Field '{field}' overflows")]
    Overflow { field: &'static str },
}

/// Result type for payload validation.
pub type Result<T> = std::result::Result<T, DomainError>;
