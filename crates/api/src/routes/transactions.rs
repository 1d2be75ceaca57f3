//! Transaction endpoints. Every mutation goes through the sync engine so
//! linked inventory stays consistent.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::TransactionId;
use domain::{Page, Transaction, TransactionCreate, TransactionSearch, TransactionUpdate};
use inventory_sync::OperationResult;
use remote::{RemoteStore, TransactionResource};

use crate::error::{self, ApiError};
use crate::state::AppState;

/// GET /transactions?skip=&limit=
pub async fn list<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.remote.list_transactions(page).await?))
}

/// GET /transactions/search?owner_id=&q=&transaction_type=&date_from=&date_to=&inventory_id=
pub async fn search<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(search): Query<TransactionSearch>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.remote.search_transactions(&search).await?))
}

/// GET /transactions/{id}
pub async fn get<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(
        state.remote.get_transaction(TransactionId::new(id)).await?,
    ))
}

/// POST /transactions
///
/// Returns 201 once the record exists, even if the inventory step failed;
/// such failures are listed under `warnings`.
pub async fn create<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(payload): Json<TransactionCreate>,
) -> Result<(StatusCode, Json<OperationResult<Transaction>>), ApiError> {
    let outcome = state.engine.create(payload).await?;
    state.refresh_status().await;
    tracing::info!(
        transaction_id = %outcome.value.id,
        warnings = outcome.warnings.len(),
        "transaction created"
    );
    Ok((
        StatusCode::CREATED,
        Json(OperationResult::from_outcome(Ok(outcome))),
    ))
}

/// PUT /transactions/{id}
pub async fn update<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(payload): Json<TransactionUpdate>,
) -> (StatusCode, Json<OperationResult<Transaction>>) {
    let result = state.engine.update(TransactionId::new(id), payload).await;
    // Compensation may have moved stock even when the update failed.
    state.refresh_status().await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            let status = error::sync_status(e);
            error::log_failure(status, e);
            status
        }
    };
    (status, Json(OperationResult::from(result)))
}

/// DELETE /transactions/{id}
pub async fn delete<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let result = state.engine.delete(TransactionId::new(id)).await;
    state.refresh_status().await;
    result?;
    Ok(StatusCode::NO_CONTENT)
}
