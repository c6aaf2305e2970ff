//! HTTP request handlers organized by domain

pub mod advisor;
pub mod budgets;
pub mod dashboard;
pub mod reminders;
pub mod transactions;

// Re-export all handlers for use in router
pub use advisor::*;
pub use budgets::*;
pub use dashboard::*;
pub use reminders::*;
pub use transactions::*;

use serde::Deserialize;

/// Query parameters identifying the owner of the requested data
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: String,
}
