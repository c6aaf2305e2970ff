//! Reminder sweep
//!
//! Drives the reminder pipeline for one point in time: fetch today's due
//! candidates, apply the eligibility filter, send each reminder
//! independently, and persist the bookkeeping after successful sends.
//! Sends are independent: one failing transaction never aborts the rest
//! of the batch.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::db::Database;
use crate::error::Result;
use crate::mailer::Notifier;
use crate::schedule;

/// Results of one reminder sweep
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct SweepResults {
    /// Rows whose due date fell on the sweep day
    pub candidates: usize,
    /// Reminders delivered
    pub sent: usize,
    /// Candidates filtered out (already reminded today)
    pub skipped: usize,
    /// Sends that failed at the transport
    pub failed: usize,
}

/// Run one reminder sweep as of `now`.
///
/// After a successful send the transaction's `last_reminder_sent` is set
/// (never moved backwards) and `next_due_date` advances by one period so
/// the series stays live. Persistence failures after a delivered email are
/// logged and do not stop the sweep.
pub fn run_reminder_sweep(
    db: &Database,
    notifier: &Notifier,
    now: DateTime<Utc>,
) -> Result<SweepResults> {
    let due = db.find_due_transactions(now)?;

    let mut results = SweepResults {
        candidates: due.len(),
        ..Default::default()
    };

    for (transaction, owner) in due {
        if !schedule::is_due(&transaction, now) {
            results.skipped += 1;
            continue;
        }

        // is_due guarantees the due date is present
        let due_date = match transaction.next_due_date {
            Some(due_date) => due_date,
            None => {
                results.skipped += 1;
                continue;
            }
        };

        let outcome = notifier.send_reminder(&owner, &transaction, due_date);
        if !outcome.success {
            results.failed += 1;
            continue;
        }
        results.sent += 1;

        if let Err(e) = db.mark_reminder_sent(transaction.id, now) {
            warn!(
                transaction_id = transaction.id,
                error = %e,
                "Reminder sent but last_reminder_sent could not be recorded"
            );
        }

        match schedule::next_due_date(due_date, transaction.recurring) {
            Some(next) => {
                if let Err(e) = db.set_next_due_date(transaction.id, Some(next)) {
                    warn!(
                        transaction_id = transaction.id,
                        error = %e,
                        "Reminder sent but next_due_date could not be advanced"
                    );
                }
            }
            None => {
                // Unreachable for a transaction that passed is_due
                warn!(
                    transaction_id = transaction.id,
                    "Recurring transaction has no next occurrence"
                );
            }
        }
    }

    info!(
        candidates = results.candidates,
        sent = results.sent,
        skipped = results.skipped,
        failed = results.failed,
        "Reminder sweep complete"
    );

    Ok(results)
}
