//! Chart views over transactions and inventory.

pub mod inventory_chart;
pub mod ledger_chart;

pub use inventory_chart::{InventoryBar, InventoryChart, InventoryChartQuery};
pub use ledger_chart::{DailyPoint, LedgerChart, LedgerQuery};
