//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{AppError, AppState};
use tally_core::models::{Budget, NewBudget};

use super::OwnerQuery;

/// GET /api/budgets - List budgets for an owner
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let budgets = state
        .db
        .list_budgets(&params.email)
        .map_err(AppError::from_core)?;
    Ok(Json(budgets))
}

/// POST /api/budgets - Create a budget
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Json(new_budget): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    let id = state
        .db
        .create_budget(&new_budget)
        .map_err(AppError::from_core)?;

    let budget = state
        .db
        .get_budget(id)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::internal("Budget vanished after insert"))?;

    Ok(Json(budget))
}

/// GET /api/budgets/:id - Get a single budget
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Budget>, AppError> {
    let budget = state
        .db
        .get_budget(id)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found(&format!("Budget {} not found", id)))?;
    Ok(Json(budget))
}

/// PUT /api/budgets/:id - Update a budget's editable fields
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    state
        .db
        .update_budget(id, &update)
        .map_err(AppError::from_core)?;

    let budget = state
        .db
        .get_budget(id)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found(&format!("Budget {} not found", id)))?;

    Ok(Json(budget))
}
