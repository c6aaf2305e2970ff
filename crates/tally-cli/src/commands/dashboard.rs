//! Dashboard report command

use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use tally_core::schedule::days_until;
use tally_core::snapshot::Aggregator;

use super::open_db;

pub fn cmd_dashboard(db_path: &Path, no_encrypt: bool, owner: &str) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let upcoming = db.upcoming_recurring(owner)?;
    let snapshot = Aggregator::new(db).snapshot(owner)?;

    let s = &snapshot.summary;

    println!();
    println!("💰 Dashboard for {}", owner);
    println!("   ─────────────────────────────────────────────");
    println!("   Total budget:      ${:>12.2}", s.total_budget);
    println!("   Total spent:       ${:>12.2}", s.total_spent);
    println!("   Remaining:         ${:>12.2}", s.remaining_budget);
    println!("   Utilization:        {:>11.1}%", s.budget_utilization_percentage);
    println!("   Recent txs (30d):   {:>12}", s.total_transactions);
    println!("   Avg transaction:   ${:>12.2}", s.average_transaction_amount);

    if !snapshot.budgets.is_empty() {
        println!();
        println!("   Budgets:");
        for b in &snapshot.budgets {
            let marker = if b.utilization_percentage > 100.0 {
                "❗"
            } else if b.utilization_percentage > 90.0 {
                "⚠️ "
            } else {
                "  "
            };
            println!(
                "   {} {:<20} ${:>9.2} of ${:>9.2} ({:.1}%)",
                marker,
                super::truncate(&b.name, 20),
                b.total_spend,
                b.amount,
                b.utilization_percentage,
            );
        }
    }

    if !snapshot.category_totals.is_empty() {
        println!();
        println!("   Top categories:");
        for c in snapshot.category_totals.iter().take(5) {
            println!(
                "      {:<20} ${:>9.2} ({} txs)",
                super::truncate(&c.category, 20),
                c.total_amount,
                c.transaction_count
            );
        }
    }

    if !snapshot.monthly_totals.is_empty() {
        println!();
        println!("   Monthly trend:");
        for m in &snapshot.monthly_totals {
            println!("      {}  ${:>9.2}", m.month, m.total_amount);
        }
    }

    if !upcoming.is_empty() {
        let now = Utc::now();
        println!();
        println!("   Upcoming recurring:");
        for tx in &upcoming {
            if let Some(due) = tx.next_due_date {
                let days = days_until(due, now);
                let when = match days {
                    0 => "due today".to_string(),
                    d if d < 0 => format!("{} days overdue", -d),
                    1 => "due tomorrow".to_string(),
                    d => format!("due in {} days", d),
                };
                println!(
                    "      {:<20} ${:>9.2} {:<10} {}",
                    super::truncate(&tx.name, 20),
                    tx.amount,
                    tx.recurring.label(),
                    when
                );
            }
        }
    }

    if !snapshot.insights.is_empty() {
        println!();
        println!("   Insights:");
        for insight in &snapshot.insights {
            let marker = match insight.kind {
                tally_core::models::InsightKind::Warning => "⚠️ ",
                tally_core::models::InsightKind::Info => "ℹ️ ",
                tally_core::models::InsightKind::Success => "✅",
            };
            println!("   {} {}: {}", marker, insight.title, insight.message);
        }
    }

    println!();
    Ok(())
}
