//! Inventory endpoints and the stock status snapshot.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::InventoryId;
use domain::{InventoryCreate, InventoryItem, InventoryUpdate, Page};
use projections::InventoryStatus;
use remote::{InventoryResource, RemoteStore};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /inventory?skip=&limit=
pub async fn list<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    Ok(Json(state.remote.list_inventory(page).await?))
}

/// GET /inventory/{id}
pub async fn get<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<InventoryItem>, ApiError> {
    Ok(Json(state.remote.get_inventory(InventoryId::new(id)).await?))
}

/// POST /inventory
pub async fn create<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(payload): Json<InventoryCreate>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    let item = state.remote.create_inventory(payload).await?;
    state.refresh_status().await;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /inventory/{id}: full-record replace.
pub async fn update<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(payload): Json<InventoryUpdate>,
) -> Result<Json<InventoryItem>, ApiError> {
    let item = state
        .remote
        .update_inventory(InventoryId::new(id), payload)
        .await?;
    state.refresh_status().await;
    Ok(Json(item))
}

/// DELETE /inventory/{id}
pub async fn delete<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.remote.delete_inventory(InventoryId::new(id)).await?;
    state.refresh_status().await;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    #[serde(default)]
    pub refresh: bool,
}

/// GET /inventory/status?refresh=true
///
/// Serves the last snapshot; computes one first when none exists yet or a
/// refresh is requested.
pub async fn status<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<StatusParams>,
) -> Result<Json<InventoryStatus>, ApiError> {
    if !params.refresh
        && let Some(snapshot) = state.status.snapshot().await
    {
        return Ok(Json(snapshot));
    }
    Ok(Json(state.status.refresh().await?))
}
