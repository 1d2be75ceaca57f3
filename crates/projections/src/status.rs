//! Inventory stock status.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use domain::{InventoryItem, Page};
use remote::InventoryResource;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::Result;

/// Items at or below this quantity (and above zero) are low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Stock alert summary for one inventory listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryStatus {
    pub out_of_stock_count: usize,
    pub low_stock_count: usize,
    pub out_of_stock_items: Vec<InventoryItem>,
    pub threshold: Decimal,
    pub refreshed_at: DateTime<Utc>,
}

/// Classifies items: `quantity == 0` is out of stock,
/// `0 < quantity <= threshold` is low stock.
pub fn classify(items: &[InventoryItem], threshold: Decimal) -> InventoryStatus {
    let out_of_stock_items: Vec<InventoryItem> = items
        .iter()
        .filter(|item| item.quantity.is_zero())
        .cloned()
        .collect();
    let low_stock_count = items
        .iter()
        .filter(|item| item.quantity > Decimal::ZERO && item.quantity <= threshold)
        .count();

    InventoryStatus {
        out_of_stock_count: out_of_stock_items.len(),
        low_stock_count,
        out_of_stock_items,
        threshold,
        refreshed_at: Utc::now(),
    }
}

/// Holds the last computed [`InventoryStatus`] and refreshes it on demand
/// or on a fixed interval.
pub struct StatusAggregator<R> {
    remote: Arc<R>,
    threshold: Decimal,
    snapshot: RwLock<Option<InventoryStatus>>,
}

impl<R: InventoryResource + 'static> StatusAggregator<R> {
    pub fn new(remote: Arc<R>) -> Self {
        Self::with_threshold(remote, DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn with_threshold(remote: Arc<R>, threshold: Decimal) -> Self {
        Self {
            remote,
            threshold,
            snapshot: RwLock::new(None),
        }
    }

    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Last computed status; `None` until the first successful refresh.
    pub async fn snapshot(&self) -> Option<InventoryStatus> {
        self.snapshot.read().await.clone()
    }

    /// Re-reads the full inventory and replaces the snapshot.
    ///
    /// On failure the previous snapshot is kept and the error returned.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<InventoryStatus> {
        let items = match self.remote.list_inventory(Page::all()).await {
            Ok(items) => items,
            Err(e) => {
                metrics::counter!("inventory_status_refresh_failures_total").increment(1);
                tracing::warn!(error = %e, "inventory status refresh failed, keeping last snapshot");
                return Err(e.into());
            }
        };

        let status = classify(&items, self.threshold);
        metrics::gauge!("inventory_out_of_stock_items").set(status.out_of_stock_count as f64);
        metrics::gauge!("inventory_low_stock_items").set(status.low_stock_count as f64);
        tracing::debug!(
            out_of_stock = status.out_of_stock_count,
            low_stock = status.low_stock_count,
            "inventory status refreshed"
        );

        *self.snapshot.write().await = Some(status.clone());
        Ok(status)
    }

    /// Refreshes immediately and then every `interval` until the handle is
    /// aborted.
    pub fn spawn_polling(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Failures are logged by refresh and the last snapshot stays.
                let _ = self.refresh().await;
            }
        })
    }
}
