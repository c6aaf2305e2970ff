//! Integration tests for tally-core
//!
//! These tests exercise the full workflows end to end: budget → transaction
//! → snapshot → advice, and the recurring-transaction reminder lifecycle
//! across multiple sweep days.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use tally_core::{
    ai::{AiClient, MockProvider},
    db::Database,
    mailer::{MailTransport, Notifier, OutgoingEmail},
    models::{Frequency, NewBudget, NewTransaction},
    reminders::run_reminder_sweep,
    snapshot::Aggregator,
    Advisor, Result,
};

const TEST_OWNER: &str = "test@example.com";

/// Records every email instead of sending it
struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl RecordingMailer {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MailTransport for RecordingMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(format!("<test-{}@tally.local>", sent.len()))
    }
}

fn budget(name: &str, amount: f64) -> NewBudget {
    NewBudget {
        name: name.to_string(),
        amount,
        category: None,
        icon: None,
        created_by: TEST_OWNER.to_string(),
    }
}

fn tx(budget_id: i64, name: &str, amount: f64, category: Option<&str>) -> NewTransaction {
    NewTransaction {
        budget_id,
        name: name.to_string(),
        amount,
        category: category.map(str::to_string),
        recurring: Frequency::None,
    }
}

// =============================================================================
// Snapshot → Advice Workflow
// =============================================================================

#[tokio::test]
async fn test_full_dashboard_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");

    let food = db.create_budget(&budget("Food", 1000.0)).unwrap();
    let shopping = db.create_budget(&budget("Shopping", 500.0)).unwrap();

    db.insert_transaction(&tx(food, "Groceries", 500.0, Some("Food")))
        .unwrap();
    db.insert_transaction(&tx(food, "Dining out", 250.0, Some("Food")))
        .unwrap();
    db.insert_transaction(&tx(shopping, "Headphones", 650.0, Some("Electronics")))
        .unwrap();

    // Snapshot: totals, per-budget utilization, and insights in one pass
    let snapshot = Aggregator::new(db.clone()).snapshot(TEST_OWNER).unwrap();

    assert_eq!(snapshot.summary.total_budget, 1500.0);
    assert_eq!(snapshot.summary.total_spent, 1400.0);
    assert_eq!(snapshot.summary.remaining_budget, 100.0);
    assert_eq!(snapshot.summary.total_transactions, 3);

    let shopping_row = snapshot
        .budgets
        .iter()
        .find(|b| b.name == "Shopping")
        .unwrap();
    assert_eq!(shopping_row.utilization_percentage, 130.0);
    assert_eq!(shopping_row.remaining_amount, -150.0);

    // Overspent budget and >90% overall utilization both warn
    assert!(snapshot
        .insights
        .iter()
        .any(|i| i.title == "Budget Overspending" && i.message.contains("Shopping")));
    assert!(snapshot
        .insights
        .iter()
        .any(|i| i.title == "High Budget Utilization"));

    // The advisor consumes the snapshot and always answers
    let advisor = Advisor::new(AiClient::mock());
    let reply = advisor.generate_insights(&snapshot, None).await;
    assert!(reply.success);
    assert!(!reply.response.is_empty());

    let tips = advisor.quick_tips(&snapshot).await;
    assert!(tips.success);
    assert!(!tips.tips.is_empty());
}

#[tokio::test]
async fn test_advice_survives_provider_outage() {
    let db = Database::in_memory().unwrap();
    let food = db.create_budget(&budget("Food", 300.0)).unwrap();
    db.insert_transaction(&tx(food, "Lunch", 20.0, None)).unwrap();

    let snapshot = Aggregator::new(db).snapshot(TEST_OWNER).unwrap();

    // A dead provider must not surface to the caller
    let advisor = Advisor::new(AiClient::Mock(MockProvider::failing()));

    let reply = advisor.generate_insights(&snapshot, Some("Any advice?")).await;
    assert!(reply.success);
    assert!(reply.provider.contains("fallback-mock"));

    let tips = advisor.quick_tips(&snapshot).await;
    assert!(tips.success);
    assert_eq!(tips.tips.len(), 3);
}

// =============================================================================
// Reminder Lifecycle
// =============================================================================

#[test]
fn test_recurring_reminder_lifecycle() {
    let db = Database::in_memory().unwrap();
    let bills = db.create_budget(&budget("Bills", 2000.0)).unwrap();

    let created = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    let rent = db
        .insert_transaction_at(
            &NewTransaction {
                recurring: Frequency::Monthly,
                ..tx(bills, "Rent", 1200.0, Some("Housing"))
            },
            created,
        )
        .unwrap();

    let mailer = RecordingMailer::new();
    let sent = mailer.sent.clone();
    let notifier = Notifier::new(mailer);

    // Day before: nothing due
    let day_before = Utc.with_ymd_and_hms(2024, 2, 14, 8, 0, 0).unwrap();
    let results = run_reminder_sweep(&db, &notifier, day_before).unwrap();
    assert_eq!(results.sent, 0);

    // Due day: reminder goes out, bookkeeping advances the series
    let due_day = Utc.with_ymd_and_hms(2024, 2, 15, 8, 0, 0).unwrap();
    let results = run_reminder_sweep(&db, &notifier, due_day).unwrap();
    assert_eq!(results.sent, 1);

    let stored = db.get_transaction(rent.id).unwrap().unwrap();
    assert_eq!(stored.last_reminder_sent, Some(due_day));
    assert_eq!(
        stored.next_due_date,
        Some(Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap())
    );

    // Re-running the sweep later the same day sends nothing more
    let same_day = Utc.with_ymd_and_hms(2024, 2, 15, 22, 0, 0).unwrap();
    let results = run_reminder_sweep(&db, &notifier, same_day).unwrap();
    assert_eq!(results.sent, 0);

    // One month on, the advanced due date fires again
    let next_month = Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
    let results = run_reminder_sweep(&db, &notifier, next_month).unwrap();
    assert_eq!(results.sent, 1);

    let emails = sent.lock().unwrap();
    assert_eq!(emails.len(), 2);
    assert!(emails.iter().all(|e| e.to == TEST_OWNER));
    assert!(emails[0].subject.contains("Rent"));
}
