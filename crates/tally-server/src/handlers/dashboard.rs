//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{AppError, AppState};
use tally_core::models::FinancialSnapshot;
use tally_core::snapshot::Aggregator;

use super::OwnerQuery;

/// GET /api/dashboard - The owner's financial snapshot
///
/// Computed fresh on every request; a store failure yields 503 with no
/// partial data.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<FinancialSnapshot>, AppError> {
    let aggregator = Aggregator::new(state.db.clone());
    let snapshot = aggregator
        .snapshot(&params.email)
        .map_err(AppError::from_core)?;
    Ok(Json(snapshot))
}
