//! Shared application state.

use std::sync::Arc;

use inventory_sync::InventorySyncEngine;
use projections::StatusAggregator;
use remote::{RemoteStore, UserCache};

use crate::config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<R> {
    pub remote: Arc<R>,
    pub engine: InventorySyncEngine<R>,
    pub users: UserCache<R>,
    pub status: Arc<StatusAggregator<R>>,
}

impl<R: RemoteStore + 'static> AppState<R> {
    pub fn new(remote: Arc<R>, config: &Config) -> Self {
        Self {
            engine: InventorySyncEngine::new(Arc::clone(&remote)),
            users: UserCache::with_ttl(Arc::clone(&remote), config.users_cache_ttl),
            status: Arc::new(StatusAggregator::with_threshold(
                Arc::clone(&remote),
                config.low_stock_threshold,
            )),
            remote,
        }
    }

    /// Recomputes the stock status after a write that moved inventory.
    /// A failed refresh is logged by the aggregator and otherwise ignored.
    pub async fn refresh_status(&self) {
        let _ = self.status.refresh().await;
    }
}
