//! Tally CLI - Personal budget tracker
//!
//! Usage:
//!   tally init                      Initialize database
//!   tally budget add --name Food --amount 500 --owner me@example.com
//!   tally tx add --budget 1 --name Rent --amount 1200 --recurring monthly
//!   tally dashboard --owner me@example.com
//!   tally ask --owner me@example.com "How can I save more?"
//!   tally remind                    Run one reminder sweep
//!   tally serve --port 3000         Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Budget { command } => match command {
            BudgetCommands::Add {
                name,
                amount,
                category,
                icon,
                owner,
            } => commands::cmd_budget_add(
                &cli.db,
                cli.no_encrypt,
                &name,
                amount,
                category.as_deref(),
                icon.as_deref(),
                &owner,
            ),
            BudgetCommands::List { owner } => {
                commands::cmd_budget_list(&cli.db, cli.no_encrypt, &owner)
            }
        },
        Commands::Tx { command } => match command {
            TxCommands::Add {
                budget,
                name,
                amount,
                category,
                recurring,
            } => commands::cmd_tx_add(
                &cli.db,
                cli.no_encrypt,
                budget,
                &name,
                amount,
                category.as_deref(),
                &recurring,
            ),
            TxCommands::List { owner, page, limit } => {
                commands::cmd_tx_list(&cli.db, cli.no_encrypt, &owner, page, limit)
            }
        },
        Commands::Dashboard { owner } => commands::cmd_dashboard(&cli.db, cli.no_encrypt, &owner),
        Commands::Ask { owner, question } => {
            commands::cmd_ask(&cli.db, cli.no_encrypt, &owner, question.as_deref()).await
        }
        Commands::Tips { owner } => commands::cmd_tips(&cli.db, cli.no_encrypt, &owner).await,
        Commands::Remind => commands::cmd_remind(&cli.db, cli.no_encrypt),
        Commands::EmailTest { to } => commands::cmd_email_test(&to),
        Commands::Serve { host, port } => {
            commands::cmd_serve(&cli.db, cli.no_encrypt, &host, port).await
        }
    }
}
