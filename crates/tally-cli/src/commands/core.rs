//! Core command implementations (init, status) and shared utilities

use std::path::Path;

use anyhow::{Context, Result};

use tally_core::db::{Database, DB_KEY_ENV};

/// Open the database, encrypted unless --no-encrypt was passed
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path = db_path.to_string_lossy();
    let db = if no_encrypt {
        Database::new_unencrypted(&path)
    } else {
        Database::new(&path)
    };
    db.with_context(|| format!("Failed to open database at {}", path))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    println!();
    println!("✅ Database initialized: {}", db.path());
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    }
    println!();
    println!("   Next steps:");
    println!("     tally budget add --name Groceries --amount 500 --owner you@example.com");
    println!("     tally tx add --budget 1 --name Lunch --amount 12.50");
    println!("     tally dashboard --owner you@example.com");

    Ok(())
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Tally Status");
    println!("   ─────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                if let Ok((budgets, transactions)) = db.counts() {
                    println!();
                    println!("   Budgets: {}", budgets);
                    println!("   Transactions: {}", transactions);
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}
