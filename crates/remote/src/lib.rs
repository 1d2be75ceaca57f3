//! Remote data access for the inventory tracker.
//!
//! The remote store exposes independent, non-transactional collections
//! (`users`, `categories`, `weights`, `inventory`, `transactions`). Each one
//! is modelled as an async resource trait; [`RemoteStore`] bundles them.
//!
//! Two implementations are provided:
//! - [`HttpRemote`]: JSON over HTTP with timeout and GET retry
//! - [`InMemoryRemote`]: a complete local store with failure injection

pub mod cache;
pub mod error;
pub mod http;
pub mod memory;
pub mod store;

pub use cache::UserCache;
pub use error::{RemoteError, Result};
pub use http::{HttpRemote, HttpRemoteConfig};
pub use memory::InMemoryRemote;
pub use store::{
    CategoryResource, InventoryResource, RemoteStore, TransactionResource, UserResource,
    WeightResource,
};
