//! Thin wrappers over the remote collections the engine depends on.
//!
//! They translate remote failures into [`SyncError`](crate::SyncError)
//! variants and hold no state between calls.

pub mod inventory;
pub mod transactions;

pub use inventory::InventoryAccessor;
pub use transactions::TransactionAccessor;
