pub mod analytics;
pub mod catalog;
pub mod health;
pub mod inventory;
pub mod metrics;
pub mod transactions;
pub mod users;
