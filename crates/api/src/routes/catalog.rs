//! Category and weight endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{CategoryId, WeightId};
use domain::{
    Category, CategoryCreate, CategoryUpdate, Page, Weight, WeightCreate, WeightUpdate,
};
use remote::{CategoryResource, RemoteStore, WeightResource};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /categories?skip=&limit=
pub async fn list_categories<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.remote.list_categories(page).await?))
}

/// POST /categories
pub async fn create_category<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.remote.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/{id}
pub async fn update_category<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .remote
        .update_category(CategoryId::new(id), payload)
        .await?;
    Ok(Json(category))
}

/// DELETE /categories/{id}
pub async fn delete_category<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.remote.delete_category(CategoryId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /weights?skip=&limit=
pub async fn list_weights<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Weight>>, ApiError> {
    Ok(Json(state.remote.list_weights(page).await?))
}

/// POST /weights
pub async fn create_weight<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(payload): Json<WeightCreate>,
) -> Result<(StatusCode, Json<Weight>), ApiError> {
    let weight = state.remote.create_weight(payload).await?;
    Ok((StatusCode::CREATED, Json(weight)))
}

/// PUT /weights/{id}
pub async fn update_weight<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(payload): Json<WeightUpdate>,
) -> Result<Json<Weight>, ApiError> {
    let weight = state.remote.update_weight(WeightId::new(id), payload).await?;
    Ok(Json(weight))
}

/// DELETE /weights/{id}
pub async fn delete_weight<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.remote.delete_weight(WeightId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
