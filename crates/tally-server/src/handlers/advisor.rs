//! Advisor handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use tally_core::advisor::{InsightReply, TipsReply};
use tally_core::snapshot::Aggregator;

use super::OwnerQuery;

/// Request body for insight generation
#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    pub email: String,
    /// Optional user question; absent means a general analysis
    pub question: Option<String>,
}

/// POST /api/advisor/insights - Generate financial advice
///
/// The snapshot fetch can fail (503); advice generation itself cannot,
/// because provider failures fall back to the local generator.
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<InsightReply>, AppError> {
    let aggregator = Aggregator::new(state.db.clone());
    let snapshot = aggregator
        .snapshot(&request.email)
        .map_err(AppError::from_core)?;

    let reply = state
        .advisor
        .generate_insights(&snapshot, request.question.as_deref())
        .await;

    Ok(Json(reply))
}

/// GET /api/advisor/tips - Quick one-line tips
pub async fn quick_tips(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<TipsReply>, AppError> {
    let aggregator = Aggregator::new(state.db.clone());
    let snapshot = aggregator
        .snapshot(&params.email)
        .map_err(AppError::from_core)?;

    let reply = state.advisor.quick_tips(&snapshot).await;

    Ok(Json(reply))
}
