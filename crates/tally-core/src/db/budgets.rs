//! Budget operations

use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetSpend, NewBudget};

fn map_budget(row: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        icon: row.get(4)?,
        created_by: row.get(5)?,
    })
}

impl Database {
    /// Insert a new budget after validating it
    pub fn create_budget(&self, budget: &NewBudget) -> Result<i64> {
        budget.validate()?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budgets (name, amount, category, icon, created_by)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                budget.name.trim(),
                budget.amount,
                budget.category,
                budget.icon,
                budget.created_by.trim(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a budget by ID
    pub fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            "SELECT id, name, amount, category, icon, created_by FROM budgets WHERE id = ?1",
            params![id],
            map_budget,
        );

        match result {
            Ok(budget) => Ok(Some(budget)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all budgets owned by `owner`
    pub fn list_budgets(&self, owner: &str) -> Result<Vec<Budget>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, amount, category, icon, created_by
            FROM budgets
            WHERE created_by = ?1
            ORDER BY id
            "#,
        )?;

        let budgets = stmt
            .query_map(params![owner], map_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Update a budget's editable fields
    pub fn update_budget(&self, id: i64, budget: &NewBudget) -> Result<()> {
        budget.validate()?;

        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE budgets
            SET name = ?1, amount = ?2, category = ?3, icon = ?4
            WHERE id = ?5
            "#,
            params![
                budget.name.trim(),
                budget.amount,
                budget.category,
                budget.icon,
                id
            ],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Budget {} not found", id)));
        }
        Ok(())
    }

    /// List an owner's budgets joined with transaction totals
    ///
    /// Outer join semantics: a budget with zero transactions yields
    /// spend = 0 and count = 0, not an absent row.
    pub fn budgets_with_spend(&self, owner: &str) -> Result<Vec<BudgetSpend>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT b.id, b.name, b.amount, b.category, b.icon,
                   COALESCE(SUM(t.amount), 0) AS total_spend,
                   COUNT(t.id) AS transaction_count
            FROM budgets b
            LEFT JOIN transactions t ON t.budget_id = b.id
            WHERE b.created_by = ?1
            GROUP BY b.id, b.name, b.amount, b.category, b.icon
            ORDER BY b.id
            "#,
        )?;

        let budgets = stmt
            .query_map(params![owner], |row| {
                Ok(BudgetSpend {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    amount: row.get(2)?,
                    category: row.get(3)?,
                    icon: row.get(4)?,
                    total_spend: row.get(5)?,
                    transaction_count: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }
}
