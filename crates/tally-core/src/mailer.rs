//! Reminder email delivery
//!
//! `MailTransport` is the seam to the outside world: `SmtpMailer` implements
//! it over lettre's SMTP relay, and tests substitute recording/failing fakes.
//! `Notifier` formats reminder messages and returns structured outcomes -
//! a transport failure never propagates past it.

use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Serialize;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::models::Transaction;

/// An email ready for the transport
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mail-sending capability
///
/// Returns the transport-assigned message identifier on success.
pub trait MailTransport: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> Result<String>;
}

/// SMTP configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl SmtpConfig {
    /// Parse configuration from environment variables
    ///
    /// Returns None if mail is not configured (SMTP_HOST not set).
    /// SMTP_PORT defaults to 587 and SMTP_FROM to SMTP_USER.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let username = std::env::var("SMTP_USER").unwrap_or_default();
        let password = std::env::var("SMTP_PASS").unwrap_or_default();
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);
        let from = std::env::var("SMTP_FROM").unwrap_or_else(|_| username.clone());

        Some(Self {
            host,
            port,
            username,
            password,
            from,
        })
    }
}

/// SMTP mail transport backed by lettre
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| Error::Mail(format!("Invalid from address '{}': {}", config.from, e)))?;

        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| Error::Mail(format!("Failed to create SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    /// Create a mailer from environment variables; None when unconfigured
    pub fn from_env() -> Option<Result<Self>> {
        SmtpConfig::from_env().map(|config| Self::new(&config))
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| Error::Mail(format!("Invalid recipient '{}': {}", email.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| Error::Mail(format!("Failed to build email: {}", e)))?;

        let response = self
            .transport
            .send(&message)
            .map_err(|e| Error::Mail(e.to_string()))?;

        let message_id = response
            .message()
            .next()
            .map(str::to_string)
            .unwrap_or_default();
        Ok(message_id)
    }
}

/// Outcome of one reminder send
#[derive(Debug, Clone, Serialize)]
pub struct ReminderOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReminderOutcome {
    fn sent(message_id: String) -> Self {
        Self {
            success: true,
            message_id: Some(message_id),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error),
        }
    }
}

/// Formats reminder messages and hands them to the mail transport
///
/// Decides nothing and persists nothing: eligibility belongs to
/// `schedule::is_due`, and recording `last_reminder_sent` belongs to the
/// sweep.
pub struct Notifier {
    transport: Box<dyn MailTransport>,
}

impl Notifier {
    pub fn new<M: MailTransport + 'static>(transport: M) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Send a reminder for a recurring transaction due on `due_date`
    pub fn send_reminder(
        &self,
        recipient: &str,
        transaction: &Transaction,
        due_date: DateTime<Utc>,
    ) -> ReminderOutcome {
        let email = OutgoingEmail {
            to: recipient.to_string(),
            subject: format!(
                "Reminder: {} - Recurring Transaction Due",
                transaction.name
            ),
            html: reminder_html(transaction, due_date),
        };

        match self.transport.send(&email) {
            Ok(message_id) => {
                info!(
                    transaction = %transaction.name,
                    recipient = %recipient,
                    message_id = %message_id,
                    "Reminder email sent"
                );
                ReminderOutcome::sent(message_id)
            }
            Err(e) => {
                error!(
                    transaction = %transaction.name,
                    recipient = %recipient,
                    error = %e,
                    "Failed to send reminder email"
                );
                ReminderOutcome::failed(e.to_string())
            }
        }
    }

    /// Send a test email to verify the SMTP configuration
    pub fn send_test(&self, recipient: &str) -> ReminderOutcome {
        let email = OutgoingEmail {
            to: recipient.to_string(),
            subject: "Test Email - Tally".to_string(),
            html: "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
                   <h2 style=\"color: #333;\">Email Configuration Test</h2>\
                   <p>This is a test email to verify your email configuration is working correctly.</p>\
                   <p>If you received this email, your recurring transaction reminders will work properly!</p>\
                   </div>"
                .to_string(),
        };

        match self.transport.send(&email) {
            Ok(message_id) => ReminderOutcome::sent(message_id),
            Err(e) => ReminderOutcome::failed(e.to_string()),
        }
    }
}

/// Render the reminder email body
fn reminder_html(transaction: &Transaction, due_date: DateTime<Utc>) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">Recurring Transaction Reminder</h2>

  <div style="background-color: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #495057; margin-top: 0;">Transaction Details</h3>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Amount:</strong> ${amount:.2}</p>
    <p><strong>Category:</strong> {category}</p>
    <p><strong>Frequency:</strong> {frequency}</p>
    <p><strong>Next Due Date:</strong> {due}</p>
  </div>

  <div style="background-color: #e3f2fd; padding: 15px; border-radius: 8px; margin: 20px 0;">
    <p style="margin: 0; color: #1976d2;">
      <strong>Reminder:</strong> This is an automated reminder for your recurring transaction.
      Don't forget to add this transaction to your budget tracker!
    </p>
  </div>

  <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">
  <p style="color: #6c757d; font-size: 12px; text-align: center;">
    This is an automated email from Tally. If you no longer want to receive these reminders,
    you can update your transaction settings in the dashboard.
  </p>
</div>"#,
        name = transaction.name,
        amount = transaction.amount,
        category = transaction.category.as_deref().unwrap_or("Uncategorized"),
        frequency = transaction.recurring.label(),
        due = due_date.format("%B %d, %Y"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use crate::test_utils::{FailingMailer, RecordingMailer};
    use chrono::TimeZone;

    fn sample_transaction() -> Transaction {
        Transaction {
            id: 1,
            budget_id: 1,
            name: "Netflix".into(),
            amount: 15.99,
            category: None,
            recurring: Frequency::Monthly,
            next_due_date: Some(Utc.with_ymd_and_hms(2024, 2, 15, 9, 0, 0).unwrap()),
            last_reminder_sent: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_send_reminder_success() {
        let mailer = RecordingMailer::new();
        let sent = mailer.sent.clone();
        let notifier = Notifier::new(mailer);
        let tx = sample_transaction();
        let due = tx.next_due_date.unwrap();

        let outcome = notifier.send_reminder("user@example.com", &tx, due);

        assert!(outcome.success);
        assert!(outcome.message_id.is_some());
        assert!(outcome.error.is_none());

        let emails = sent.lock().unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].to, "user@example.com");
        assert!(emails[0].subject.contains("Netflix"));
        // Missing category folds into "Uncategorized", frequency shows its label
        assert!(emails[0].html.contains("Uncategorized"));
        assert!(emails[0].html.contains("Monthly"));
        assert!(emails[0].html.contains("February 15, 2024"));
    }

    #[test]
    fn test_send_reminder_failure_is_structured() {
        let notifier = Notifier::new(FailingMailer);
        let tx = sample_transaction();
        let due = tx.next_due_date.unwrap();

        // A transport failure never panics or propagates
        let outcome = notifier.send_reminder("user@example.com", &tx, due);

        assert!(!outcome.success);
        assert!(outcome.message_id.is_none());
        assert!(outcome.error.unwrap().contains("connection refused"));
    }

    #[test]
    fn test_send_test_email() {
        let mailer = RecordingMailer::new();
        let sent = mailer.sent.clone();
        let notifier = Notifier::new(mailer);

        let outcome = notifier.send_test("user@example.com");
        assert!(outcome.success);

        let emails = sent.lock().unwrap();
        assert!(emails[0].subject.contains("Test Email"));
    }
}
