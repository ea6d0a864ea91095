use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use super::auth::CurrentUser;
use super::AppState;
use crate::models::{ListTransactionsQuery, TransactionListResponse};
use crate::services::transaction_service;
use crate::utils::{check_rate_limit, ApiError};

/// `GET /api/transactions`
pub async fn list_transactions(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    // 0 disables the limiter
    let budget = state.config.rate_limit_per_second;
    if budget > 0 {
        if let Err(remaining_ms) = check_rate_limit(user_id, budget).await {
            return Err(ApiError::too_many_requests(format!(
                "Too many requests. Try again in {} ms",
                remaining_ms
            )));
        }
    }

    let Query(raw) = query?;

    let response =
        transaction_service::list_transactions(&state.pool, user_id, raw, state.listing_options())
            .await?;

    Ok(Json(response))
}
