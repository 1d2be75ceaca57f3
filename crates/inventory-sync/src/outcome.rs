//! Structured result handed to the view layer.

use serde::Serialize;

use crate::error::SyncError;
use crate::steps::{SyncOutcome, SyncWarning};

/// Success flag plus a human-readable message, the shape the view layer
/// renders. Errors are never dropped on the way here: a failed operation
/// carries its message and kind, a successful one its tolerated warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SyncWarning>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            kind: None,
            data: Some(data),
            warnings: Vec::new(),
        }
    }

    pub fn failed(error: &SyncError) -> Self {
        Self {
            success: false,
            message: Some(error.to_string()),
            kind: Some(error.kind()),
            data: None,
            warnings: Vec::new(),
        }
    }

    /// Converts an engine result that may carry warnings. The message
    /// summarizes the warnings when there are any.
    pub fn from_outcome(result: Result<SyncOutcome<T>, SyncError>) -> Self {
        match result {
            Ok(outcome) => {
                let message = (!outcome.is_clean()).then(|| {
                    outcome
                        .warnings
                        .iter()
                        .map(|w| w.message.as_str())
                        .collect::<Vec<_>>()
                        .join("; ")
                });
                Self {
                    success: true,
                    message,
                    kind: None,
                    data: Some(outcome.value),
                    warnings: outcome.warnings,
                }
            }
            Err(e) => Self::failed(&e),
        }
    }
}

impl<T> From<Result<T, SyncError>> for OperationResult<T> {
    fn from(result: Result<T, SyncError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(&e),
        }
    }
}
