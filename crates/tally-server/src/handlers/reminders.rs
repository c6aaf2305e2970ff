//! Reminder handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::{AppError, AppState};
use tally_core::mailer::ReminderOutcome;
use tally_core::reminders::{run_reminder_sweep, SweepResults};

/// Request body for the test email endpoint
#[derive(Debug, Deserialize)]
pub struct TestEmailRequest {
    pub email: String,
}

/// POST /api/reminders/run - Run one reminder sweep now
///
/// Intended for an external scheduler (cron) when the built-in interval
/// scheduler is not enabled.
pub async fn run_reminders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SweepResults>, AppError> {
    let notifier = state
        .notifier
        .as_ref()
        .ok_or_else(|| AppError::unavailable("SMTP is not configured"))?;

    let results =
        run_reminder_sweep(&state.db, notifier, Utc::now()).map_err(AppError::from_core)?;

    Ok(Json(results))
}

/// POST /api/reminders/test - Send a test email to verify SMTP settings
pub async fn send_test_email(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TestEmailRequest>,
) -> Result<Json<ReminderOutcome>, AppError> {
    let notifier = state
        .notifier
        .as_ref()
        .ok_or_else(|| AppError::unavailable("SMTP is not configured"))?;

    Ok(Json(notifier.send_test(&request.email)))
}
