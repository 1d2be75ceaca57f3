//! Chart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::{Datelike, Utc};
use common::{TransactionType, UserId};
use projections::{InventoryChart, InventoryChartQuery, LedgerChart, LedgerQuery};
use remote::RemoteStore;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Query for the ledger chart. Year and month default to the current
/// month; `transaction_type` defaults to `expense` and `all` disables the
/// type filter.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerParams {
    pub owner_id: Option<UserId>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub transaction_type: Option<String>,
}

impl LedgerParams {
    fn into_query(self) -> Result<LedgerQuery, ApiError> {
        let today = Utc::now().date_naive();
        let transaction_type = match self.transaction_type.as_deref().map(str::trim) {
            None | Some("") => Some(TransactionType::Expense),
            Some(t) if t.eq_ignore_ascii_case("all") => None,
            Some(t) => Some(t.parse::<TransactionType>().map_err(ApiError::BadRequest)?),
        };
        let mut query = LedgerQuery::new(
            self.year.unwrap_or(today.year()),
            self.month.unwrap_or(today.month()),
        )
        .transaction_type(transaction_type);
        if let Some(owner) = self.owner_id {
            query = query.owner(owner);
        }
        Ok(query)
    }
}

/// GET /analytics/ledger?owner_id=&year=&month=&transaction_type=
pub async fn ledger<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<LedgerParams>,
) -> Result<Json<LedgerChart>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(LedgerChart::load(state.remote.as_ref(), &query).await?))
}

/// GET /analytics/inventory?category_id=&weight_id=
pub async fn inventory<R: RemoteStore + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<InventoryChartQuery>,
) -> Result<Json<InventoryChart>, ApiError> {
    Ok(Json(
        InventoryChart::load(state.remote.as_ref(), &query).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_params_type_selection() {
        let params = LedgerParams {
            year: Some(2025),
            month: Some(10),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.transaction_type, Some(TransactionType::Expense));
        assert_eq!((query.year, query.month), (2025, 10));

        let params = LedgerParams {
            transaction_type: Some("ALL".to_string()),
            ..Default::default()
        };
        assert_eq!(params.into_query().unwrap().transaction_type, None);

        let params = LedgerParams {
            transaction_type: Some("earning".to_string()),
            owner_id: Some(UserId::new(3)),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.transaction_type, Some(TransactionType::Earning));
        assert_eq!(query.owner_id, Some(UserId::new(3)));
    }

    #[test]
    fn test_ledger_params_rejects_unknown_type() {
        let params = LedgerParams {
            transaction_type: Some("refund".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.into_query(), Err(ApiError::BadRequest(_))));
    }
}
