//! Derived read views over the remote store.
//!
//! - [`StatusAggregator`]: polls inventory and classifies items as out of
//!   stock or low on stock, keeping the last snapshot in memory
//! - [`LedgerChart`]: daily totals of one month of transactions
//! - [`InventoryChart`]: stock per item, with resolved category and weight
//!   names

pub mod error;
pub mod status;
pub mod views;

pub use error::{ProjectionError, Result};
pub use status::{InventoryStatus, StatusAggregator, classify};
pub use views::{DailyPoint, InventoryBar, InventoryChart, InventoryChartQuery, LedgerChart, LedgerQuery};
