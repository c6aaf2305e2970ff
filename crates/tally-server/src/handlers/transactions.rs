//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use tally_core::db::TransactionPage;
use tally_core::models::{NewTransaction, Transaction};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub email: String,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// GET /api/transactions - List an owner's transactions, paginated
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionPage>, AppError> {
    // Input validation: clamp pagination parameters
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);

    let result = state
        .db
        .list_transactions(&params.email, page, limit)
        .map_err(AppError::from_core)?;

    Ok(Json(result))
}

/// POST /api/transactions - Create a transaction
///
/// The creation time anchors the recurrence: the stored transaction
/// carries a derived `next_due_date` when a recurrence rule is set.
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(new_tx): Json<NewTransaction>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .db
        .insert_transaction(&new_tx)
        .map_err(AppError::from_core)?;

    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .db
        .delete_transaction(id)
        .map_err(AppError::from_core)?;
    Ok(Json(serde_json::json!({ "success": true })))
}
