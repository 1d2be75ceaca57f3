//! Inventory accessor.

use std::sync::Arc;

use common::InventoryId;
use domain::InventoryItem;
use remote::{InventoryResource, RemoteError};
use rust_decimal::Decimal;

use crate::error::{Result, SyncError};

/// Fetches items and writes new stock levels.
pub struct InventoryAccessor<R> {
    remote: Arc<R>,
}

impl<R> Clone for InventoryAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
        }
    }
}

impl<R: InventoryResource> InventoryAccessor<R> {
    pub fn new(remote: Arc<R>) -> Self {
        Self { remote }
    }

    /// Fetches the current state of an item; absence is `SyncError::NotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_by_id(&self, id: InventoryId) -> Result<InventoryItem> {
        self.remote.get_inventory(id).await.map_err(|e| match e {
            RemoteError::NotFound { .. } => SyncError::NotFound {
                entity: "Inventory",
                id: id.to_string(),
            },
            other => SyncError::Remote(other),
        })
    }

    /// Writes `quantity` as the item's new stock level.
    ///
    /// The full record is sent: name, category and weight are copied from
    /// `item` so the write never depends on partial-update support.
    #[tracing::instrument(skip(self, item), fields(inventory_id = %item.id))]
    pub async fn apply_quantity(
        &self,
        item: &InventoryItem,
        quantity: Decimal,
    ) -> Result<InventoryItem> {
        self.remote
            .update_inventory(item.id, item.with_quantity(quantity))
            .await
            .map_err(|e| SyncError::InventoryUpdateFailed {
                inventory_id: item.id,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remote::InMemoryRemote;

    #[tokio::test]
    async fn test_fetch_missing_item() {
        let accessor = InventoryAccessor::new(Arc::new(InMemoryRemote::new()));
        let err = accessor.fetch_by_id(InventoryId::new(3)).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound { entity: "Inventory", .. }));
    }

    #[tokio::test]
    async fn test_apply_quantity_keeps_other_fields() {
        let remote = Arc::new(InMemoryRemote::new());
        let item = remote.seed_inventory("LPG 11kg", Decimal::from(100)).await;
        let accessor = InventoryAccessor::new(remote.clone());

        let updated = accessor
            .apply_quantity(&item, Decimal::from(90))
            .await
            .unwrap();
        assert_eq!(updated.quantity, Decimal::from(90));
        assert_eq!(updated.name, "LPG 11kg");
        assert_eq!(updated.category_id, item.category_id);
        assert_eq!(updated.weight_id, item.weight_id);
    }

    #[tokio::test]
    async fn test_failed_write_is_inventory_update_failed() {
        let remote = Arc::new(InMemoryRemote::new());
        let item = remote.seed_inventory("Coke", Decimal::from(4)).await;
        remote.set_fail_on_inventory_update(true).await;

        let err = InventoryAccessor::new(remote)
            .apply_quantity(&item, Decimal::from(3))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::InventoryUpdateFailed { .. }));
    }
}
