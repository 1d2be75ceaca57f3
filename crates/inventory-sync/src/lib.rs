//! Inventory/transaction consistency engine.
//!
//! The remote store keeps inventory items and transactions as independent
//! resources with no shared transaction. [`InventorySyncEngine`] runs every
//! transaction mutation as a short sequence of steps and compensates when a
//! later step fails:
//!
//! - create: pre-validate stock, persist the transaction, apply the effect.
//!   A failed inventory step is reported as a warning, never rolled back.
//! - update: reverse the old effect, apply the new one, then persist.
//!   A failed forward step restores the reversed effect.
//! - delete: reverse the effect, then remove the record. A failed reversal
//!   aborts the delete.

pub mod accessors;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod steps;

pub use accessors::{InventoryAccessor, TransactionAccessor};
pub use engine::InventorySyncEngine;
pub use error::{Result, SyncError};
pub use outcome::OperationResult;
pub use steps::{Adjustment, InventoryEffect, SyncOutcome, SyncWarning};
