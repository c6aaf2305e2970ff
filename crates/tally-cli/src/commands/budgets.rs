//! Budget command implementations

use std::path::Path;

use anyhow::Result;

use tally_core::models::NewBudget;

use super::open_db;

#[allow(clippy::too_many_arguments)]
pub fn cmd_budget_add(
    db_path: &Path,
    no_encrypt: bool,
    name: &str,
    amount: f64,
    category: Option<&str>,
    icon: Option<&str>,
    owner: &str,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let id = db.create_budget(&NewBudget {
        name: name.to_string(),
        amount,
        category: category.map(str::to_string),
        icon: icon.map(str::to_string),
        created_by: owner.to_string(),
    })?;

    println!("✅ Budget #{} created: {} (${:.2})", id, name, amount);
    Ok(())
}

pub fn cmd_budget_list(db_path: &Path, no_encrypt: bool, owner: &str) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let budgets = db.budgets_with_spend(owner)?;

    if budgets.is_empty() {
        println!("No budgets yet. Create one with `tally budget add`.");
        return Ok(());
    }

    println!();
    println!(
        "   {:<4} {:<20} {:>10} {:>10} {:>10} {:>6}",
        "ID", "Name", "Amount", "Spent", "Left", "Txs"
    );
    println!("   ─────────────────────────────────────────────────────────────────");
    for b in &budgets {
        println!(
            "   {:<4} {:<20} {:>10.2} {:>10.2} {:>10.2} {:>6}",
            b.id,
            super::truncate(&b.name, 20),
            b.amount,
            b.total_spend,
            b.amount - b.total_spend,
            b.transaction_count,
        );
    }
    println!();

    Ok(())
}
