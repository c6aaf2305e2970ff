//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track budgets, spending, and recurring transactions
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal budget tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status and row counts
    Status,

    /// Manage budgets
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },

    /// Manage transactions
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },

    /// Show the financial dashboard for an owner
    Dashboard {
        /// Owner email
        #[arg(short, long)]
        owner: String,
    },

    /// Ask the AI advisor about your finances
    Ask {
        /// Owner email
        #[arg(short, long)]
        owner: String,

        /// Question to ask (omit for a general analysis)
        question: Option<String>,
    },

    /// Get quick financial tips
    Tips {
        /// Owner email
        #[arg(short, long)]
        owner: String,
    },

    /// Run one reminder sweep for due recurring transactions
    Remind,

    /// Send a test email to verify SMTP configuration
    EmailTest {
        /// Recipient address
        #[arg(short, long)]
        to: String,
    },

    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget
    Add {
        /// Budget name
        #[arg(short, long)]
        name: String,

        /// Allocated amount
        #[arg(short, long)]
        amount: f64,

        /// Category label
        #[arg(short, long)]
        category: Option<String>,

        /// Icon reference
        #[arg(long)]
        icon: Option<String>,

        /// Owner email
        #[arg(short, long)]
        owner: String,
    },

    /// List budgets with spend totals
    List {
        /// Owner email
        #[arg(short, long)]
        owner: String,
    },
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Log a transaction against a budget
    Add {
        /// Budget ID
        #[arg(short, long)]
        budget: i64,

        /// Transaction name
        #[arg(short, long)]
        name: String,

        /// Amount (must be > 0)
        #[arg(short, long)]
        amount: f64,

        /// Category label
        #[arg(short, long)]
        category: Option<String>,

        /// Recurrence rule: none, daily, weekly, monthly, yearly
        #[arg(short, long, default_value = "none")]
        recurring: String,
    },

    /// List transactions, newest first
    List {
        /// Owner email
        #[arg(short, long)]
        owner: String,

        /// Page number
        #[arg(long, default_value = "1")]
        page: i64,

        /// Page size
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}
