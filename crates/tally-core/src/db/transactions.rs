//! Transaction operations
//!
//! CRUD, the snapshot queries (recent window, category and monthly totals),
//! and the reminder bookkeeping (`find_due_transactions`,
//! `mark_reminder_sent`, `set_next_due_date`).

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::Serialize;

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    CategoryTotal, Frequency, MonthlyTotal, NewTransaction, RecentTransaction, Transaction,
};
use crate::schedule;

const TX_COLUMNS: &str =
    "id, budget_id, name, amount, category, recurring, next_due_date, last_reminder_sent, created_at";

fn map_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let recurring: String = row.get(5)?;
    let next_due: Option<String> = row.get(6)?;
    let last_sent: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Transaction {
        id: row.get(0)?,
        budget_id: row.get(1)?,
        name: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        recurring: Frequency::parse(&recurring),
        next_due_date: next_due.map(|s| parse_datetime(&s)),
        last_reminder_sent: last_sent.map(|s| parse_datetime(&s)),
        created_at: parse_datetime(&created_at),
    })
}

/// One page of an owner's transactions plus the total row count
#[derive(Debug, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<RecentTransaction>,
    pub total_transactions: i64,
    pub page: i64,
    pub limit: i64,
}

impl Database {
    /// Insert a validated transaction, stamping `created_at` with the
    /// current time and deriving `next_due_date` from the recurrence rule
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        self.insert_transaction_at(tx, Utc::now())
    }

    /// Insert a validated transaction with an explicit creation time
    ///
    /// The creation time is the recurrence anchor: `next_due_date` is one
    /// period after it (or absent for one-time transactions).
    pub fn insert_transaction_at(
        &self,
        tx: &NewTransaction,
        created_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        tx.validate()?;

        if self.get_budget(tx.budget_id)?.is_none() {
            return Err(Error::Validation(format!(
                "Budget {} does not exist",
                tx.budget_id
            )));
        }

        let next_due = schedule::next_due_date(created_at, tx.recurring);

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (budget_id, name, amount, category, recurring, next_due_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                tx.budget_id,
                tx.name.trim(),
                tx.amount,
                tx.category,
                tx.recurring.as_str(),
                next_due.map(format_datetime),
                format_datetime(created_at),
            ],
        )?;

        Ok(Transaction {
            id: conn.last_insert_rowid(),
            budget_id: tx.budget_id,
            name: tx.name.trim().to_string(),
            amount: tx.amount,
            category: tx.category.clone(),
            recurring: tx.recurring,
            next_due_date: next_due,
            last_reminder_sent: None,
            created_at,
        })
    }

    /// Get a transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            &format!("SELECT {} FROM transactions WHERE id = ?1", TX_COLUMNS),
            params![id],
            map_transaction,
        );

        match result {
            Ok(tx) => Ok(Some(tx)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a transaction by ID
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }

    /// List an owner's transactions newest-first, paginated
    pub fn list_transactions(&self, owner: &str, page: i64, limit: i64) -> Result<TransactionPage> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let conn = self.conn()?;

        let total: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM transactions t
            JOIN budgets b ON b.id = t.budget_id
            WHERE b.created_by = ?1
            "#,
            params![owner],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name, t.amount, t.category, t.recurring, t.created_at, b.name
            FROM transactions t
            JOIN budgets b ON b.id = t.budget_id
            WHERE b.created_by = ?1
            ORDER BY t.created_at DESC, t.id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;

        let transactions = stmt
            .query_map(params![owner, limit, (page - 1) * limit], |row| {
                let recurring: String = row.get(4)?;
                let created_at: String = row.get(5)?;
                Ok(RecentTransaction {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    amount: row.get(2)?,
                    category: row.get(3)?,
                    recurring: Frequency::parse(&recurring),
                    created_at: parse_datetime(&created_at),
                    budget_name: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(TransactionPage {
            transactions,
            total_transactions: total,
            page,
            limit,
        })
    }

    /// An owner's transactions created at or after `since`, newest-first,
    /// capped at 50 rows
    pub fn recent_transactions(
        &self,
        owner: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<RecentTransaction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name, t.amount, t.category, t.recurring, t.created_at, b.name
            FROM transactions t
            JOIN budgets b ON b.id = t.budget_id
            WHERE b.created_by = ?1 AND t.created_at >= ?2
            ORDER BY t.created_at DESC, t.id DESC
            LIMIT 50
            "#,
        )?;

        let transactions = stmt
            .query_map(params![owner, format_datetime(since)], |row| {
                let recurring: String = row.get(4)?;
                let created_at: String = row.get(5)?;
                Ok(RecentTransaction {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    amount: row.get(2)?,
                    category: row.get(3)?,
                    recurring: Frequency::parse(&recurring),
                    created_at: parse_datetime(&created_at),
                    budget_name: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Spending totals grouped by category across all of an owner's
    /// transactions (missing category folds into "Uncategorized")
    pub fn category_totals(&self, owner: &str) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT COALESCE(t.category, 'Uncategorized') AS category,
                   COALESCE(SUM(t.amount), 0) AS total_amount,
                   COUNT(t.id) AS transaction_count
            FROM transactions t
            JOIN budgets b ON b.id = t.budget_id
            WHERE b.created_by = ?1
            GROUP BY COALESCE(t.category, 'Uncategorized')
            ORDER BY total_amount DESC
            "#,
        )?;

        let totals = stmt
            .query_map(params![owner], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total_amount: row.get(1)?,
                    transaction_count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Monthly spending totals since `since`, grouped by calendar
    /// year+month, chronologically ascending
    pub fn monthly_totals(&self, owner: &str, since: DateTime<Utc>) -> Result<Vec<MonthlyTotal>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT strftime('%Y-%m', t.created_at) AS month,
                   COALESCE(SUM(t.amount), 0) AS total_amount,
                   COUNT(t.id) AS transaction_count
            FROM transactions t
            JOIN budgets b ON b.id = t.budget_id
            WHERE b.created_by = ?1 AND t.created_at >= ?2
            GROUP BY month
            ORDER BY month ASC
            "#,
        )?;

        let totals = stmt
            .query_map(params![owner, format_datetime(since)], |row| {
                Ok(MonthlyTotal {
                    month: row.get(0)?,
                    total_amount: row.get(1)?,
                    transaction_count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Recurring transactions whose next due date falls on the same UTC
    /// day as `now`, paired with the owning budget's owner email
    ///
    /// This narrows the sweep to today's candidates; `schedule::is_due`
    /// still makes the final eligibility decision per row.
    pub fn find_due_transactions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(Transaction, String)>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.budget_id, t.name, t.amount, t.category, t.recurring,
                   t.next_due_date, t.last_reminder_sent, t.created_at, b.created_by
            FROM transactions t
            JOIN budgets b ON b.id = t.budget_id
            WHERE t.recurring != 'none'
              AND t.next_due_date IS NOT NULL
              AND date(t.next_due_date) = date(?1)
            ORDER BY t.id
            "#,
        )?;

        let due = stmt
            .query_map(params![format_datetime(now)], |row| {
                let tx = map_transaction(row)?;
                let owner: String = row.get(9)?;
                Ok((tx, owner))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(due)
    }

    /// An owner's recurring transactions ordered by next due date
    pub fn upcoming_recurring(&self, owner: &str) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.budget_id, t.name, t.amount, t.category, t.recurring,
                   t.next_due_date, t.last_reminder_sent, t.created_at
            FROM transactions t
            JOIN budgets b ON b.id = t.budget_id
            WHERE b.created_by = ?1
              AND t.recurring != 'none'
              AND t.next_due_date IS NOT NULL
            ORDER BY t.next_due_date ASC
            "#,
        )?;

        let upcoming = stmt
            .query_map(params![owner], map_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(upcoming)
    }

    /// Record that a reminder went out at `at`.
    ///
    /// `last_reminder_sent` is monotonically non-decreasing: an update that
    /// would move it backwards is refused. Returns whether a row changed.
    pub fn mark_reminder_sent(&self, id: i64, at: DateTime<Utc>) -> Result<bool> {
        let conn = self.conn()?;

        let changed = conn.execute(
            r#"
            UPDATE transactions
            SET last_reminder_sent = ?1
            WHERE id = ?2
              AND (last_reminder_sent IS NULL OR last_reminder_sent <= ?1)
            "#,
            params![format_datetime(at), id],
        )?;

        Ok(changed > 0)
    }

    /// Overwrite a transaction's next due date (None clears it)
    pub fn set_next_due_date(&self, id: i64, due: Option<DateTime<Utc>>) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE transactions SET next_due_date = ?1 WHERE id = ?2",
            params![due.map(format_datetime), id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }
}
