//! Background reminder scheduler
//!
//! Optional periodic reminder sweeps, enabled via environment variables:
//!
//! - `TALLY_REMINDER_SCHEDULE`: Interval in hours (e.g., "24" for daily)
//!
//! The scheduler runs in the background and sends due-transaction reminder
//! emails on every tick. Sweep failures are logged, never fatal.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{error, info, warn};

use tally_core::reminders::run_reminder_sweep;

use crate::AppState;

/// Configuration for scheduled reminder sweeps
#[derive(Debug, Clone)]
pub struct ReminderScheduleConfig {
    /// Interval between sweeps in hours
    pub interval_hours: u64,
}

impl ReminderScheduleConfig {
    /// Parse configuration from environment variables
    ///
    /// Returns None if scheduling is not configured (TALLY_REMINDER_SCHEDULE
    /// not set).
    pub fn from_env() -> Option<Self> {
        let interval_hours: u64 = std::env::var("TALLY_REMINDER_SCHEDULE")
            .ok()
            .and_then(|s| s.parse().ok())?;

        if interval_hours == 0 {
            warn!("TALLY_REMINDER_SCHEDULE is 0, scheduled reminders disabled");
            return None;
        }

        Some(Self { interval_hours })
    }
}

/// Start the reminder scheduler as a background task
pub fn start_reminder_scheduler(state: Arc<AppState>, config: ReminderScheduleConfig) {
    if state.notifier.is_none() {
        warn!("Reminder schedule configured but SMTP is not; scheduler not started");
        return;
    }

    info!(
        "Starting reminder scheduler: every {} hours",
        config.interval_hours
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_hours * 3600));

        // Skip the first immediate tick - we don't want to sweep on startup
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let notifier = match state.notifier.as_ref() {
                Some(notifier) => notifier,
                None => continue,
            };

            info!("Running scheduled reminder sweep...");

            match run_reminder_sweep(&state.db, notifier, Utc::now()) {
                Ok(results) => {
                    info!(
                        "Scheduled sweep: {} sent, {} skipped, {} failed",
                        results.sent, results.skipped, results.failed
                    );
                }
                Err(e) => {
                    error!("Scheduled reminder sweep failed: {}", e);
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_not_set() {
        // When TALLY_REMINDER_SCHEDULE is not set, should return None
        std::env::remove_var("TALLY_REMINDER_SCHEDULE");
        assert!(ReminderScheduleConfig::from_env().is_none());
    }

    #[test]
    fn test_config_from_env_zero() {
        // When TALLY_REMINDER_SCHEDULE is 0, should return None
        std::env::set_var("TALLY_REMINDER_SCHEDULE", "0");
        assert!(ReminderScheduleConfig::from_env().is_none());
        std::env::remove_var("TALLY_REMINDER_SCHEDULE");
    }
}
