//! Domain models for Tally

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named spending allocation owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub name: String,
    /// Allocated amount, non-negative
    pub amount: f64,
    pub category: Option<String>,
    pub icon: Option<String>,
    /// Owner identity (email) - acts as the tenant key
    pub created_by: String,
}

/// A new budget before insertion
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub name: String,
    pub amount: f64,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub created_by: String,
}

impl NewBudget {
    /// Validate budget input before it reaches the store
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name is required");
        }
        if self.amount < 0.0 {
            errors.push("Amount must not be negative");
        }
        if self.created_by.trim().is_empty() {
            errors.push("Owner is required");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors.join("; ")))
        }
    }
}

/// Recurrence rule for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Display label ("One-time", "Daily", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "One-time",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// Parse a frequency label, case-insensitively.
    ///
    /// Unrecognized labels map to `Frequency::None` ("not recurring"),
    /// never to an error.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single expense record attributed to a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub budget_id: i64,
    pub name: String,
    /// Amount spent, always > 0
    pub amount: f64,
    pub category: Option<String>,
    pub recurring: Frequency,
    /// Next occurrence; set if and only if `recurring` is not `None`
    pub next_due_date: Option<DateTime<Utc>>,
    /// When a reminder was last sent; never moves backwards
    pub last_reminder_sent: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A new transaction before insertion
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub budget_id: i64,
    pub name: String,
    pub amount: f64,
    pub category: Option<String>,
    #[serde(default)]
    pub recurring: Frequency,
}

impl NewTransaction {
    /// Validate transaction input before it reaches the store
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name is required");
        }
        if self.amount <= 0.0 {
            errors.push("Amount must be greater than 0");
        }
        if self.budget_id <= 0 {
            errors.push("Budget ID is required");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors.join("; ")))
        }
    }
}

/// A budget row joined with its transaction totals
///
/// Produced by an outer join: a budget with no transactions yields
/// `total_spend = 0` and `transaction_count = 0`, not an absent row.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSpend {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub total_spend: f64,
    pub transaction_count: i64,
}

/// Per-budget utilization derived for the snapshot
#[derive(Debug, Clone, Serialize)]
pub struct BudgetUtilization {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub total_spend: f64,
    pub transaction_count: i64,
    /// spend / amount * 100, or 0 when the allocation is 0
    pub utilization_percentage: f64,
    /// amount - spend, unclamped (negative signals overspend)
    pub remaining_amount: f64,
}

/// A transaction as listed on the dashboard (joined with its budget name)
#[derive(Debug, Clone, Serialize)]
pub struct RecentTransaction {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub category: Option<String>,
    pub recurring: Frequency,
    pub created_at: DateTime<Utc>,
    pub budget_name: String,
}

/// Spending total for one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
    pub transaction_count: i64,
}

/// Spending total for one calendar month ("YYYY-MM")
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total_amount: f64,
    pub transaction_count: i64,
}

/// Severity of a derived insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Info,
    Success,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule-derived observation about the user's finances
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

/// Overall totals for the snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSummary {
    pub total_budget: f64,
    pub total_spent: f64,
    /// total_budget - total_spent, unclamped
    pub remaining_budget: f64,
    /// Count of transactions in the recent window
    pub total_transactions: i64,
    pub average_transaction_amount: f64,
    pub budget_utilization_percentage: f64,
}

/// The derived, non-persisted aggregate view of a user's financial state
///
/// Computed fresh on each request; never cached.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSnapshot {
    pub summary: SnapshotSummary,
    pub budgets: Vec<BudgetUtilization>,
    pub recent_transactions: Vec<RecentTransaction>,
    pub category_totals: Vec<CategoryTotal>,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub insights: Vec<Insight>,
}

impl FinancialSnapshot {
    /// An all-zero snapshot (useful as an advisor input when no data exists)
    pub fn empty() -> Self {
        Self {
            summary: SnapshotSummary {
                total_budget: 0.0,
                total_spent: 0.0,
                remaining_budget: 0.0,
                total_transactions: 0,
                average_transaction_amount: 0.0,
                budget_utilization_percentage: 0.0,
            },
            budgets: vec![],
            recent_transactions: vec![],
            category_totals: vec![],
            monthly_totals: vec![],
            insights: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parse_case_insensitive() {
        assert_eq!(Frequency::parse("Daily"), Frequency::Daily);
        assert_eq!(Frequency::parse("WEEKLY"), Frequency::Weekly);
        assert_eq!(Frequency::parse("monthly"), Frequency::Monthly);
        assert_eq!(Frequency::parse("Yearly"), Frequency::Yearly);
    }

    #[test]
    fn test_frequency_parse_unknown_is_none() {
        assert_eq!(Frequency::parse("none"), Frequency::None);
        assert_eq!(Frequency::parse("bogus"), Frequency::None);
        assert_eq!(Frequency::parse(""), Frequency::None);
    }

    #[test]
    fn test_frequency_labels() {
        assert_eq!(Frequency::None.label(), "One-time");
        assert_eq!(Frequency::Monthly.label(), "Monthly");
    }

    #[test]
    fn test_new_transaction_validation() {
        let valid = NewTransaction {
            budget_id: 1,
            name: "Coffee".into(),
            amount: 5.50,
            category: None,
            recurring: Frequency::None,
        };
        assert!(valid.validate().is_ok());

        let no_name = NewTransaction {
            name: "  ".into(),
            ..valid.clone()
        };
        let err = no_name.validate().unwrap_err();
        assert!(err.to_string().contains("Name is required"));

        let zero_amount = NewTransaction {
            amount: 0.0,
            ..valid.clone()
        };
        let err = zero_amount.validate().unwrap_err();
        assert!(err.to_string().contains("greater than 0"));

        let no_budget = NewTransaction {
            budget_id: 0,
            ..valid
        };
        assert!(no_budget.validate().is_err());
    }

    #[test]
    fn test_new_budget_validation() {
        let valid = NewBudget {
            name: "Groceries".into(),
            amount: 500.0,
            category: None,
            icon: None,
            created_by: "user@example.com".into(),
        };
        assert!(valid.validate().is_ok());

        let negative = NewBudget {
            amount: -1.0,
            ..valid
        };
        assert!(negative.validate().is_err());
    }
}
