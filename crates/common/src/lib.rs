//! Shared types for the inventory tracker.
//!
//! - Typed record identifiers for every remote collection
//! - [`TransactionType`] and its inventory direction
//! - Quantity arithmetic over string-or-number decimal values

pub mod quantity;
pub mod types;

pub use quantity::{lenient, parse_decimal, signed_delta, to_number};
pub use types::{CategoryId, InventoryId, TransactionId, TransactionType, UserId, WeightId};

pub use rust_decimal::Decimal;
