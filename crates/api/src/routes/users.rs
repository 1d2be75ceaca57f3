//! User endpoints, served through the user cache.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::UserId;
use domain::{User, UserCreate, UserUpdate};
use remote::RemoteStore;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub refresh: bool,
}

/// GET /users?refresh=true
pub async fn list<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list(params.refresh).await?))
}

/// GET /users/{id}
pub async fn get<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get(UserId::new(id)).await?))
}

/// POST /users
pub async fn create<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/{id}
pub async fn update<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.update(UserId::new(id), payload).await?))
}

/// DELETE /users/{id}
pub async fn delete<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
