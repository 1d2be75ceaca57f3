//! HTTP API server with observability for the inventory tracker.
//!
//! Exposes the remote collections as plain JSON endpoints, routes every
//! transaction mutation through the inventory sync engine, and serves the
//! stock status and chart views. Structured logging (tracing) and
//! Prometheus metrics are wired in `main`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use remote::RemoteStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: RemoteStore + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    use routes::{analytics, catalog, inventory, transactions, users};

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/users", get(users::list::<R>).post(users::create::<R>))
        .route(
            "/users/{id}",
            get(users::get::<R>)
                .put(users::update::<R>)
                .delete(users::delete::<R>),
        )
        .route(
            "/categories",
            get(catalog::list_categories::<R>).post(catalog::create_category::<R>),
        )
        .route(
            "/categories/{id}",
            axum::routing::put(catalog::update_category::<R>)
                .delete(catalog::delete_category::<R>),
        )
        .route(
            "/weights",
            get(catalog::list_weights::<R>).post(catalog::create_weight::<R>),
        )
        .route(
            "/weights/{id}",
            axum::routing::put(catalog::update_weight::<R>).delete(catalog::delete_weight::<R>),
        )
        .route(
            "/inventory",
            get(inventory::list::<R>).post(inventory::create::<R>),
        )
        .route("/inventory/status", get(inventory::status::<R>))
        .route(
            "/inventory/{id}",
            get(inventory::get::<R>)
                .put(inventory::update::<R>)
                .delete(inventory::delete::<R>),
        )
        .route(
            "/transactions",
            get(transactions::list::<R>).post(transactions::create::<R>),
        )
        .route("/transactions/search", get(transactions::search::<R>))
        .route(
            "/transactions/{id}",
            get(transactions::get::<R>)
                .put(transactions::update::<R>)
                .delete(transactions::delete::<R>),
        )
        .route("/analytics/ledger", get(analytics::ledger::<R>))
        .route("/analytics/inventory", get(analytics::inventory::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds the shared state over a remote store.
pub fn create_state<R: RemoteStore + 'static>(remote: Arc<R>, config: &Config) -> Arc<AppState<R>> {
    Arc::new(AppState::new(remote, config))
}
