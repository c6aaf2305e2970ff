//! Tally Web Server
//!
//! Axum-based REST API for the Tally budget tracker.
//!
//! The owner identity is passed explicitly on each request (`?email=` query
//! parameter or a request-body field); authentication is out of scope and
//! the server is intended to sit behind a trusted proxy or on localhost.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use tally_core::ai::{AiClient, Provider};
use tally_core::db::Database;
use tally_core::mailer::{Notifier, SmtpMailer};
use tally_core::Advisor;

mod handlers;
mod scheduler;

pub use scheduler::{start_reminder_scheduler, ReminderScheduleConfig};

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub advisor: Advisor,
    /// Mail delivery; None when SMTP is not configured
    pub notifier: Option<Notifier>,
}

/// Create the application router
pub fn create_router(db: Database, advisor: Advisor, notifier: Option<Notifier>) -> Router {
    let state = Arc::new(AppState {
        db,
        advisor,
        notifier,
    });
    create_router_with_state(state)
}

/// Create the application router over pre-built state (for testing and
/// for sharing the state with the reminder scheduler)
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route(
            "/budgets/:id",
            get(handlers::get_budget).put(handlers::update_budget),
        )
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            axum::routing::delete(handlers::delete_transaction),
        )
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Advisor
        .route("/advisor/insights", post(handlers::generate_insights))
        .route("/advisor/tips", get(handlers::quick_tips))
        // Reminders
        .route("/reminders/run", post(handlers::run_reminders))
        .route("/reminders/test", post(handlers::send_test_email))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the server, wiring advisor, mailer, and scheduler from environment
pub async fn run_server(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    let advisor = Advisor::from_env();
    check_ai_connection().await;

    let notifier = match SmtpMailer::from_env() {
        Some(Ok(mailer)) => {
            info!("SMTP mail transport configured");
            Some(Notifier::new(mailer))
        }
        Some(Err(e)) => {
            error!("SMTP configuration invalid, reminders disabled: {}", e);
            None
        }
        None => {
            info!("SMTP not configured (set SMTP_HOST to enable reminder emails)");
            None
        }
    };

    let state = Arc::new(AppState {
        db,
        advisor,
        notifier,
    });

    // Start the reminder scheduler if configured
    if let Some(config) = ReminderScheduleConfig::from_env() {
        start_reminder_scheduler(state.clone(), config);
    }

    let app = create_router_with_state(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI provider connection status
async fn check_ai_connection() {
    let client = AiClient::from_env();
    if client.health_check().await {
        info!(
            "AI provider ready: {} (model: {})",
            client.name(),
            client.model()
        );
    } else {
        info!(
            "AI provider {} not reachable; advice falls back to the local generator",
            client.name()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error to the matching HTTP status
    pub fn from_core(err: tally_core::Error) -> Self {
        use tally_core::Error;
        match err {
            Error::Validation(msg) => Self::bad_request(&msg),
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::DataUnavailable(msg) => Self::unavailable(&msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(other.into()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
