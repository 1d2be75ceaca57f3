//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory_sync::{OperationResult, SyncError};
use projections::ProjectionError;
use remote::RemoteError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Remote store failure on a plain data operation.
    Remote(RemoteError),
    /// Inventory sync failure on a transaction mutation.
    Sync(SyncError),
    /// Chart or status view failure.
    Projection(ProjectionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Remote(err) => (remote_status(&err), err.to_string()),
            ApiError::Sync(err) => {
                // Transaction mutations answer with the same shape on failure
                // as on success.
                let status = sync_status(&err);
                log_failure(status, &err);
                return (status, axum::Json(OperationResult::<()>::failed(&err))).into_response();
            }
            ApiError::Projection(err) => {
                let status = match &err {
                    ProjectionError::Remote(inner) => remote_status(inner),
                    ProjectionError::InvalidMonth { .. } => StatusCode::BAD_REQUEST,
                    ProjectionError::Overflow { .. } => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string())
            }
        };

        log_failure(status, &message);
        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

pub(crate) fn log_failure(status: StatusCode, error: &dyn std::fmt::Display) {
    if status.is_server_error() {
        tracing::error!(%status, %error, "request failed");
    }
}

fn remote_status(err: &RemoteError) -> StatusCode {
    match err {
        RemoteError::NotFound { .. } => StatusCode::NOT_FOUND,
        RemoteError::Invalid(_) => StatusCode::BAD_REQUEST,
        // Client errors reported by the remote store are the caller's fault.
        RemoteError::Status { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
        }
        RemoteError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub(crate) fn sync_status(err: &SyncError) -> StatusCode {
    match err {
        SyncError::NotFound { .. } => StatusCode::NOT_FOUND,
        SyncError::InsufficientInventory { .. } | SyncError::Invalid(_) => StatusCode::BAD_REQUEST,
        SyncError::InventoryUpdateFailed { .. } | SyncError::TransactionPersistenceFailed(_) => {
            StatusCode::BAD_GATEWAY
        }
        SyncError::Remote(inner) => remote_status(inner),
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        ApiError::Remote(err)
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        ApiError::Sync(err)
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Projection(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::InventoryId;
    use rust_decimal::Decimal;

    #[test]
    fn test_sync_status_mapping() {
        let insufficient = SyncError::InsufficientInventory {
            inventory_id: InventoryId::new(1),
            available: Decimal::from(2),
            requested: Decimal::from(5),
        };
        assert_eq!(sync_status(&insufficient), StatusCode::BAD_REQUEST);
        assert_eq!(
            sync_status(&SyncError::NotFound {
                entity: "Transaction",
                id: "9".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            sync_status(&SyncError::TransactionPersistenceFailed("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_remote_status_mapping() {
        assert_eq!(
            remote_status(&RemoteError::not_found("inventory", 4)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            remote_status(&RemoteError::Status {
                status: 422,
                message: "bad".to_string()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            remote_status(&RemoteError::Status {
                status: 503,
                message: "down".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
