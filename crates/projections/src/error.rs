//! Projection error types.

use thiserror::Error;

/// Errors that can occur while building a view.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The remote store could not be read.
    #[error("Remote error: {0}")]
    Remote(#[from] remote::RemoteError),

    /// The requested month does not exist.
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// Summed amounts do not fit in a decimal.
    #[error("Amount overflow while totalling {day}")]
    Overflow { day: chrono::NaiveDate },
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
