//! AI advisor command implementations

use std::path::Path;

use anyhow::Result;

use tally_core::snapshot::Aggregator;
use tally_core::Advisor;

use super::open_db;

pub async fn cmd_ask(
    db_path: &Path,
    no_encrypt: bool,
    owner: &str,
    question: Option<&str>,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let snapshot = Aggregator::new(db).snapshot(owner)?;

    let advisor = Advisor::from_env();
    let reply = advisor.generate_insights(&snapshot, question).await;

    println!();
    println!("🤖 Advisor ({})", reply.provider);
    println!("   ─────────────────────────────────────────────");
    for line in reply.response.lines() {
        println!("   {}", line);
    }
    println!();

    Ok(())
}

pub async fn cmd_tips(db_path: &Path, no_encrypt: bool, owner: &str) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let snapshot = Aggregator::new(db).snapshot(owner)?;

    let advisor = Advisor::from_env();
    let reply = advisor.quick_tips(&snapshot).await;

    println!();
    println!("💡 Quick tips ({})", reply.provider);
    for tip in &reply.tips {
        println!("   • {}", tip);
    }
    println!();

    Ok(())
}
