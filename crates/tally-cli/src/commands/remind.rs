//! Reminder sweep and SMTP test commands

use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::Utc;

use tally_core::mailer::{Notifier, SmtpMailer};
use tally_core::reminders::run_reminder_sweep;

use super::open_db;

fn notifier_from_env() -> Result<Notifier> {
    match SmtpMailer::from_env() {
        Some(Ok(mailer)) => Ok(Notifier::new(mailer)),
        Some(Err(e)) => Err(anyhow!("SMTP configuration invalid: {}", e)),
        None => Err(anyhow!(
            "SMTP is not configured. Set SMTP_HOST, SMTP_USER, SMTP_PASS (and optionally SMTP_PORT, SMTP_FROM)."
        )),
    }
}

pub fn cmd_remind(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let notifier = notifier_from_env()?;

    let results = run_reminder_sweep(&db, &notifier, Utc::now())?;

    println!();
    println!("📧 Reminder sweep");
    println!("   Candidates: {}", results.candidates);
    println!("   Sent:       {}", results.sent);
    println!("   Skipped:    {}", results.skipped);
    println!("   Failed:     {}", results.failed);
    println!();

    Ok(())
}

pub fn cmd_email_test(to: &str) -> Result<()> {
    let notifier = notifier_from_env()?;

    let outcome = notifier.send_test(to);
    if outcome.success {
        println!(
            "✅ Test email sent to {} (message id: {})",
            to,
            outcome.message_id.unwrap_or_default()
        );
    } else {
        println!(
            "❌ Test email failed: {}",
            outcome.error.unwrap_or_default()
        );
    }

    Ok(())
}
