//! Transaction command implementations

use std::path::Path;

use anyhow::Result;

use tally_core::models::{Frequency, NewTransaction};

use super::open_db;

pub fn cmd_tx_add(
    db_path: &Path,
    no_encrypt: bool,
    budget_id: i64,
    name: &str,
    amount: f64,
    category: Option<&str>,
    recurring: &str,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let tx = db.insert_transaction(&NewTransaction {
        budget_id,
        name: name.to_string(),
        amount,
        category: category.map(str::to_string),
        recurring: Frequency::parse(recurring),
    })?;

    println!("✅ Transaction #{} logged: {} (${:.2})", tx.id, tx.name, tx.amount);
    if let Some(due) = tx.next_due_date {
        println!(
            "   🔁 {} - next due {}",
            tx.recurring.label(),
            due.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn cmd_tx_list(
    db_path: &Path,
    no_encrypt: bool,
    owner: &str,
    page: i64,
    limit: i64,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let result = db.list_transactions(owner, page, limit)?;

    if result.transactions.is_empty() {
        println!("No transactions on page {}.", result.page);
        return Ok(());
    }

    println!();
    println!(
        "   {:<4} {:<24} {:>10} {:<14} {:<10} {:<10}",
        "ID", "Name", "Amount", "Category", "Repeats", "Date"
    );
    println!("   ──────────────────────────────────────────────────────────────────────────");
    for t in &result.transactions {
        println!(
            "   {:<4} {:<24} {:>10.2} {:<14} {:<10} {:<10}",
            t.id,
            super::truncate(&t.name, 24),
            t.amount,
            super::truncate(t.category.as_deref().unwrap_or("Uncategorized"), 14),
            t.recurring.label(),
            t.created_at.format("%Y-%m-%d"),
        );
    }
    println!();
    println!(
        "   Page {} of {} ({} total)",
        result.page,
        (result.total_transactions + result.limit - 1) / result.limit.max(1),
        result.total_transactions
    );
    println!();

    Ok(())
}
