//! Transaction accessor.

use std::sync::Arc;

use common::TransactionId;
use domain::{Transaction, TransactionCreate, TransactionUpdate};
use remote::{RemoteError, TransactionResource};

use crate::error::{Result, SyncError};

/// Reads and writes transaction records. Never touches inventory.
pub struct TransactionAccessor<R> {
    remote: Arc<R>,
}

impl<R> Clone for TransactionAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
        }
    }
}

fn not_found_or(id: TransactionId, err: RemoteError, other: fn(RemoteError) -> SyncError) -> SyncError {
    match err {
        RemoteError::NotFound { .. } => SyncError::NotFound {
            entity: "Transaction",
            id: id.to_string(),
        },
        err => other(err),
    }
}

fn persistence_failed(err: RemoteError) -> SyncError {
    SyncError::TransactionPersistenceFailed(err.to_string())
}

impl<R: TransactionResource> TransactionAccessor<R> {
    pub fn new(remote: Arc<R>) -> Self {
        Self { remote }
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_by_id(&self, id: TransactionId) -> Result<Transaction> {
        self.remote
            .get_transaction(id)
            .await
            .map_err(|e| not_found_or(id, e, SyncError::Remote))
    }

    #[tracing::instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create(&self, payload: TransactionCreate) -> Result<Transaction> {
        self.remote
            .create_transaction(payload)
            .await
            .map_err(persistence_failed)
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update(&self, id: TransactionId, payload: TransactionUpdate) -> Result<Transaction> {
        self.remote
            .update_transaction(id, payload)
            .await
            .map_err(|e| not_found_or(id, e, persistence_failed))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: TransactionId) -> Result<()> {
        self.remote
            .delete_transaction(id)
            .await
            .map_err(|e| not_found_or(id, e, persistence_failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::UserId;
    use remote::InMemoryRemote;

    #[tokio::test]
    async fn test_missing_transaction_is_not_found() {
        let accessor = TransactionAccessor::new(Arc::new(InMemoryRemote::new()));
        let err = accessor.fetch_by_id(TransactionId::new(8)).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound { entity: "Transaction", .. }));
        let err = accessor.delete(TransactionId::new(8)).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_refused_create_is_persistence_failure() {
        let remote = Arc::new(InMemoryRemote::new());
        remote.set_fail_on_transaction_create(true).await;
        let date = Utc.with_ymd_and_hms(2025, 10, 21, 0, 0, 0).unwrap();

        let err = TransactionAccessor::new(remote)
            .create(TransactionCreate::new("Rent", UserId::new(1), date))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::TransactionPersistenceFailed(_)));
    }
}
