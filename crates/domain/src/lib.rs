//! Domain models for the inventory tracker.
//!
//! This crate provides the canonical, normalized shapes of every remote
//! entity together with their create/update payloads:
//! - [`InventoryItem`] with its full-replace update record
//! - [`Transaction`] and the tri-state [`TransactionUpdate`]
//! - Catalog entities: [`User`], [`Category`], [`Weight`]
//! - [`TransactionSearch`] filters and [`Page`] windows
//!
//! Wire quirks (decimals as text or numbers, date-only timestamps, alternate
//! key names) are absorbed here so callers only ever see one representation.

pub mod catalog;
pub mod error;
pub mod inventory;
pub mod search;
pub mod transaction;
pub mod wire;

pub use catalog::{
    Category, CategoryCreate, CategoryUpdate, User, UserCreate, UserUpdate, Weight, WeightCreate,
    WeightUpdate,
};
pub use error::DomainError;
pub use inventory::{InventoryCreate, InventoryItem, InventoryUpdate};
pub use search::{Page, TransactionSearch};
pub use transaction::{Transaction, TransactionCreate, TransactionUpdate, line_total};
