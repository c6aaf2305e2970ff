//! Financial aggregation
//!
//! Builds the dashboard snapshot for one owner: budgets joined with spend,
//! the recent-transaction window, category and monthly totals, derived
//! summary figures, and rule-based insights. Any store failure collapses
//! into `Error::DataUnavailable`; a partial snapshot is never returned.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{
    BudgetUtilization, CategoryTotal, FinancialSnapshot, Insight, InsightKind, SnapshotSummary,
};

/// Days of history included in the recent-transaction window
const RECENT_WINDOW_DAYS: i64 = 30;

/// Months of history included in the monthly trend
const TREND_MONTHS: i64 = 6;

/// Computes financial snapshots over an injected database handle
pub struct Aggregator {
    db: Database,
}

impl Aggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Build a fresh snapshot for `owner` as of now
    pub fn snapshot(&self, owner: &str) -> Result<FinancialSnapshot> {
        self.snapshot_at(owner, Utc::now())
    }

    /// Build a fresh snapshot for `owner` as of `now`
    pub fn snapshot_at(&self, owner: &str, now: DateTime<Utc>) -> Result<FinancialSnapshot> {
        let unavailable = |e: Error| Error::DataUnavailable(e.to_string());

        let budget_rows = self.db.budgets_with_spend(owner).map_err(unavailable)?;
        let recent = self
            .db
            .recent_transactions(owner, now - Duration::days(RECENT_WINDOW_DAYS))
            .map_err(unavailable)?;
        let category_totals = self.db.category_totals(owner).map_err(unavailable)?;
        let monthly_totals = self
            .db
            .monthly_totals(owner, now - Duration::days(TREND_MONTHS * 30))
            .map_err(unavailable)?;

        let total_budget: f64 = budget_rows.iter().map(|b| b.amount).sum();
        let total_spent: f64 = budget_rows.iter().map(|b| b.total_spend).sum();
        let total_transactions = recent.len() as i64;

        let budgets: Vec<BudgetUtilization> = budget_rows
            .into_iter()
            .map(|b| BudgetUtilization {
                utilization_percentage: if b.amount > 0.0 {
                    b.total_spend / b.amount * 100.0
                } else {
                    0.0
                },
                remaining_amount: b.amount - b.total_spend,
                id: b.id,
                name: b.name,
                amount: b.amount,
                category: b.category,
                icon: b.icon,
                total_spend: b.total_spend,
                transaction_count: b.transaction_count,
            })
            .collect();

        let summary = SnapshotSummary {
            total_budget,
            total_spent,
            remaining_budget: total_budget - total_spent,
            total_transactions,
            average_transaction_amount: if total_transactions > 0 {
                total_spent / total_transactions as f64
            } else {
                0.0
            },
            budget_utilization_percentage: if total_budget > 0.0 {
                total_spent / total_budget * 100.0
            } else {
                0.0
            },
        };

        let insights = derive_insights(&budgets, &category_totals, total_budget, total_spent);

        debug!(
            owner = %owner,
            budgets = budgets.len(),
            recent = recent.len(),
            insights = insights.len(),
            "Snapshot assembled"
        );

        Ok(FinancialSnapshot {
            summary,
            budgets,
            recent_transactions: recent,
            category_totals,
            monthly_totals,
            insights,
        })
    }
}

/// Rule-based insights over the aggregated data.
///
/// Rules are evaluated in order and are independent: zero or more may fire.
/// The utilization rules are mutually exclusive and stay silent in the
/// 50-90% band, and also when no budget exists at all.
fn derive_insights(
    budgets: &[BudgetUtilization],
    categories: &[CategoryTotal],
    total_budget: f64,
    total_spent: f64,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let overspent: Vec<&BudgetUtilization> = budgets
        .iter()
        .filter(|b| b.utilization_percentage > 100.0)
        .collect();
    if !overspent.is_empty() {
        let names: Vec<&str> = overspent.iter().map(|b| b.name.as_str()).collect();
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Budget Overspending".to_string(),
            message: format!(
                "You've exceeded {} budget(s): {}",
                overspent.len(),
                names.join(", ")
            ),
        });
    }

    // Categories arrive sorted by total descending
    if let Some(top) = categories.first() {
        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Top Spending Category".to_string(),
            message: format!(
                "Your highest spending category is \"{}\" with ${:.2}",
                top.category, top.total_amount
            ),
        });
    }

    if total_budget > 0.0 {
        let utilization = total_spent / total_budget * 100.0;
        if utilization > 90.0 {
            insights.push(Insight {
                kind: InsightKind::Warning,
                title: "High Budget Utilization".to_string(),
                message: format!("You've used {:.1}% of your total budget", utilization),
            });
        } else if utilization < 50.0 {
            insights.push(Insight {
                kind: InsightKind::Success,
                title: "Good Budget Management".to_string(),
                message: format!(
                    "You're doing well! Only {:.1}% of your budget used",
                    utilization
                ),
            });
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Frequency, NewBudget, NewTransaction};
    use chrono::TimeZone;

    const OWNER: &str = "test@example.com";

    fn setup() -> (Database, Aggregator) {
        let db = Database::in_memory().unwrap();
        let aggregator = Aggregator::new(db.clone());
        (db, aggregator)
    }

    fn add_budget(db: &Database, name: &str, amount: f64) -> i64 {
        db.create_budget(&NewBudget {
            name: name.to_string(),
            amount,
            category: None,
            icon: None,
            created_by: OWNER.to_string(),
        })
        .unwrap()
    }

    fn add_tx(db: &Database, budget_id: i64, name: &str, amount: f64, category: Option<&str>) {
        db.insert_transaction(&NewTransaction {
            budget_id,
            name: name.to_string(),
            amount,
            category: category.map(str::to_string),
            recurring: Frequency::None,
        })
        .unwrap();
    }

    #[test]
    fn test_snapshot_utilization_and_remaining() {
        let (db, aggregator) = setup();
        let budget = add_budget(&db, "Food", 1000.0);
        add_tx(&db, budget, "Groceries", 500.0, Some("Food"));
        add_tx(&db, budget, "Dining", 250.0, Some("Food"));

        let snapshot = aggregator.snapshot(OWNER).unwrap();

        assert_eq!(snapshot.summary.total_budget, 1000.0);
        assert_eq!(snapshot.summary.total_spent, 750.0);
        assert_eq!(snapshot.summary.remaining_budget, 250.0);
        assert_eq!(snapshot.summary.budget_utilization_percentage, 75.0);

        let food = &snapshot.budgets[0];
        assert_eq!(food.utilization_percentage, 75.0);
        assert_eq!(food.remaining_amount, 250.0);
    }

    #[test]
    fn test_snapshot_overspend_goes_negative_and_warns() {
        let (db, aggregator) = setup();
        let budget = add_budget(&db, "Shopping", 1000.0);
        add_tx(&db, budget, "Laptop", 1200.0, Some("Electronics"));

        let snapshot = aggregator.snapshot(OWNER).unwrap();

        // No clamping to zero on overspend
        assert_eq!(snapshot.summary.remaining_budget, -200.0);
        assert_eq!(snapshot.budgets[0].utilization_percentage, 120.0);
        assert_eq!(snapshot.budgets[0].remaining_amount, -200.0);

        let warning = snapshot
            .insights
            .iter()
            .find(|i| i.title == "Budget Overspending")
            .expect("overspend warning missing");
        assert_eq!(warning.kind, InsightKind::Warning);
        assert!(warning.message.contains("Shopping"));
    }

    #[test]
    fn test_snapshot_zero_transaction_budget() {
        let (db, aggregator) = setup();
        add_budget(&db, "Untouched", 400.0);

        let snapshot = aggregator.snapshot(OWNER).unwrap();

        // No division-by-zero propagation anywhere
        assert_eq!(snapshot.budgets[0].total_spend, 0.0);
        assert_eq!(snapshot.budgets[0].utilization_percentage, 0.0);
        assert_eq!(snapshot.summary.average_transaction_amount, 0.0);
    }

    #[test]
    fn test_snapshot_empty_dataset_all_zeros() {
        let (_db, aggregator) = setup();

        let snapshot = aggregator.snapshot(OWNER).unwrap();

        assert_eq!(snapshot.summary.total_budget, 0.0);
        assert_eq!(snapshot.summary.total_spent, 0.0);
        assert_eq!(snapshot.summary.remaining_budget, 0.0);
        assert_eq!(snapshot.summary.budget_utilization_percentage, 0.0);
        assert_eq!(snapshot.summary.total_transactions, 0);
        assert!(snapshot.budgets.is_empty());
        assert!(snapshot.insights.is_empty());
    }

    #[test]
    fn test_snapshot_top_category_insight() {
        let (db, aggregator) = setup();
        let budget = add_budget(&db, "Everything", 5000.0);
        add_tx(&db, budget, "Rent", 1200.0, Some("Housing"));
        add_tx(&db, budget, "Lunch", 20.0, Some("Food"));

        let snapshot = aggregator.snapshot(OWNER).unwrap();

        let info = snapshot
            .insights
            .iter()
            .find(|i| i.title == "Top Spending Category")
            .unwrap();
        assert!(info.message.contains("Housing"));
    }

    #[test]
    fn test_snapshot_utilization_band_insights() {
        let (db, aggregator) = setup();
        let budget = add_budget(&db, "Main", 100.0);
        add_tx(&db, budget, "Small", 95.0, None);

        let snapshot = aggregator.snapshot(OWNER).unwrap();
        assert!(snapshot
            .insights
            .iter()
            .any(|i| i.title == "High Budget Utilization"));
        assert!(!snapshot
            .insights
            .iter()
            .any(|i| i.title == "Good Budget Management"));

        // Under 50% flips to the success insight
        let (db2, aggregator2) = setup();
        let budget2 = add_budget(&db2, "Main", 100.0);
        add_tx(&db2, budget2, "Small", 10.0, None);

        let snapshot2 = aggregator2.snapshot(OWNER).unwrap();
        assert!(snapshot2
            .insights
            .iter()
            .any(|i| i.title == "Good Budget Management"));
    }

    #[test]
    fn test_snapshot_mid_band_emits_neither_utilization_insight() {
        let (db, aggregator) = setup();
        let budget = add_budget(&db, "Main", 100.0);
        add_tx(&db, budget, "Half", 70.0, None);

        let snapshot = aggregator.snapshot(OWNER).unwrap();
        assert!(!snapshot
            .insights
            .iter()
            .any(|i| i.title == "High Budget Utilization"
                || i.title == "Good Budget Management"));
    }

    #[test]
    fn test_snapshot_average_transaction_amount() {
        let (db, aggregator) = setup();
        let budget = add_budget(&db, "Food", 1000.0);
        add_tx(&db, budget, "A", 100.0, None);
        add_tx(&db, budget, "B", 200.0, None);

        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        // As-of a future date the recent window is empty, so the average
        // guards against dividing by zero
        let snapshot = aggregator.snapshot_at(OWNER, now).unwrap();
        assert_eq!(snapshot.summary.total_transactions, 0);
        assert_eq!(snapshot.summary.average_transaction_amount, 0.0);

        let live = aggregator.snapshot(OWNER).unwrap();
        assert_eq!(live.summary.total_transactions, 2);
        assert_eq!(live.summary.average_transaction_amount, 150.0);
    }
}
