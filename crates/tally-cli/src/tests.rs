//! CLI command tests
//!
//! Commands take a database path, so these tests run against throwaway
//! temp-dir databases.

use tally_core::db::Database;
use tally_core::models::{Frequency, NewBudget, NewTransaction};

use crate::commands::{self, truncate};

const OWNER: &str = "test@example.com";

/// A temp directory plus the path of an initialized unencrypted database
fn setup_test_db() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");
    // Create the schema up front, as `tally init` would
    Database::new_unencrypted(&path.to_string_lossy()).unwrap();
    (dir, path)
}

fn seed_budget(path: &std::path::Path, name: &str, amount: f64) -> i64 {
    let db = Database::new_unencrypted(&path.to_string_lossy()).unwrap();
    db.create_budget(&NewBudget {
        name: name.to_string(),
        amount,
        category: None,
        icon: None,
        created_by: OWNER.to_string(),
    })
    .unwrap()
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long string", 10), "a very ...");
}

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.db");

    commands::cmd_init(&path, true).unwrap();
    assert!(path.exists());
}

#[test]
fn test_cmd_status_runs_without_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");

    // Status on a missing database reports rather than fails
    commands::cmd_status(&path, true).unwrap();
}

#[test]
fn test_cmd_budget_add_and_list() {
    let (_dir, path) = setup_test_db();

    commands::cmd_budget_add(&path, true, "Groceries", 500.0, Some("Food"), None, OWNER).unwrap();

    let db = Database::new_unencrypted(&path.to_string_lossy()).unwrap();
    let budgets = db.list_budgets(OWNER).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].name, "Groceries");

    commands::cmd_budget_list(&path, true, OWNER).unwrap();
}

#[test]
fn test_cmd_budget_add_rejects_invalid() {
    let (_dir, path) = setup_test_db();
    let result = commands::cmd_budget_add(&path, true, "", 500.0, None, None, OWNER);
    assert!(result.is_err());
}

#[test]
fn test_cmd_tx_add_recurring() {
    let (_dir, path) = setup_test_db();
    let budget = seed_budget(&path, "Bills", 2000.0);

    commands::cmd_tx_add(&path, true, budget, "Rent", 1200.0, Some("Housing"), "monthly").unwrap();

    let db = Database::new_unencrypted(&path.to_string_lossy()).unwrap();
    let page = db.list_transactions(OWNER, 1, 10).unwrap();
    assert_eq!(page.total_transactions, 1);

    let tx = db.get_transaction(page.transactions[0].id).unwrap().unwrap();
    assert_eq!(tx.recurring, Frequency::Monthly);
    assert!(tx.next_due_date.is_some());
}

#[test]
fn test_cmd_tx_add_unknown_budget_fails() {
    let (_dir, path) = setup_test_db();
    let result = commands::cmd_tx_add(&path, true, 999, "Orphan", 5.0, None, "none");
    assert!(result.is_err());
}

#[test]
fn test_cmd_tx_list_and_dashboard() {
    let (_dir, path) = setup_test_db();
    let budget = seed_budget(&path, "Food", 1000.0);

    let db = Database::new_unencrypted(&path.to_string_lossy()).unwrap();
    db.insert_transaction(&NewTransaction {
        budget_id: budget,
        name: "Lunch".to_string(),
        amount: 750.0,
        category: Some("Food".to_string()),
        recurring: Frequency::None,
    })
    .unwrap();

    commands::cmd_tx_list(&path, true, OWNER, 1, 10).unwrap();
    commands::cmd_dashboard(&path, true, OWNER).unwrap();
}

#[tokio::test]
async fn test_cmd_ask_uses_mock_fallback() {
    let (_dir, path) = setup_test_db();
    seed_budget(&path, "Food", 500.0);

    // No AI_PROVIDER configured: AiClient defaults to the mock provider,
    // so the command works offline
    commands::cmd_ask(&path, true, OWNER, Some("How can I save money?"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cmd_tips_offline() {
    let (_dir, path) = setup_test_db();
    commands::cmd_tips(&path, true, OWNER).await.unwrap();
}
