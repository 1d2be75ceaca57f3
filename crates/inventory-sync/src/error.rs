//! Sync engine error types.

use common::InventoryId;
use domain::DomainError;
use remote::RemoteError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while synchronizing inventory with transactions.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A referenced transaction or inventory item does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The movement would drive stock below zero.
    #[error("Insufficient inventory. Available: {available}, Requested: {requested}")]
    InsufficientInventory {
        inventory_id: InventoryId,
        available: Decimal,
        requested: Decimal,
    },

    /// The remote inventory write failed.
    #[error("Inventory update failed for item {inventory_id}: {reason}")]
    InventoryUpdateFailed {
        inventory_id: InventoryId,
        reason: String,
    },

    /// The remote transaction write failed.
    #[error("Transaction persistence failed: {0}")]
    TransactionPersistenceFailed(String),

    /// The payload was rejected before any remote call.
    #[error("Invalid payload: {0}")]
    Invalid(#[from] DomainError),

    /// A read from the remote store failed for a reason other than absence.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl SyncError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InsufficientInventory { .. } => "insufficient_inventory",
            Self::InventoryUpdateFailed { .. } => "inventory_update_failed",
            Self::TransactionPersistenceFailed(_) => "transaction_persistence_failed",
            Self::Invalid(_) => "invalid",
            Self::Remote(_) => "remote",
        }
    }
}

/// Convenience type alias for sync results.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_message_reports_both_quantities() {
        let err = SyncError::InsufficientInventory {
            inventory_id: InventoryId::new(1),
            available: Decimal::from(90),
            requested: Decimal::from(95),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient inventory. Available: 90, Requested: 95"
        );
        assert_eq!(err.kind(), "insufficient_inventory");
    }
}
