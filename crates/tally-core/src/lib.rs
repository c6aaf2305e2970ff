//! Tally Core Library
//!
//! Shared functionality for the Tally budget tracker:
//! - Database access and migrations
//! - Budget and transaction models with input validation
//! - Recurrence scheduling (next-due-date arithmetic, reminder eligibility)
//! - Financial aggregation for the dashboard snapshot
//! - Pluggable AI providers (Ollama, OpenAI-compatible, Hugging Face, mock)
//! - AI advisor with a deterministic local fallback
//! - SMTP reminder delivery and the reminder sweep

pub mod advisor;
pub mod ai;
pub mod db;
pub mod error;
pub mod mailer;
pub mod models;
pub mod reminders;
pub mod schedule;
pub mod snapshot;

/// Test utilities (seeded databases, fake mail transports)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advisor, InsightReply, TipsReply};
pub use ai::{
    AiClient, ChatMessage, ChatRole, Completion, CompletionOptions, HuggingFaceProvider,
    MockProvider, OllamaProvider, OpenAiCompatProvider, Provider,
};
pub use db::Database;
pub use error::{Error, Result};
pub use mailer::{MailTransport, Notifier, OutgoingEmail, ReminderOutcome, SmtpConfig, SmtpMailer};
pub use models::{
    Budget, BudgetUtilization, CategoryTotal, FinancialSnapshot, Frequency, Insight, InsightKind,
    MonthlyTotal, NewBudget, NewTransaction, RecentTransaction, SnapshotSummary, Transaction,
};
pub use reminders::{run_reminder_sweep, SweepResults};
pub use snapshot::Aggregator;
