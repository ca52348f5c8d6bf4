//! Slipstream CLI - Post parsed receipts into your budget ledger
//!
//! Usage:
//!   slipstream info                                List ledger accounts/categories/payees
//!   slipstream reconcile -r receipt.json -a NAME   Post a parsed receipt as a transaction

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use slipstream_core::LedgerClient;

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

    let client = LedgerClient::from_env()
        .context("ledger not configured; set LEDGER_BUDGET_ID and LEDGER_API_TOKEN")?;

    match cli.command {
        Commands::Info => commands::cmd_info(&client).await,
        Commands::Reconcile {
            receipt,
            account,
            as_of,
            json,
        } => commands::cmd_reconcile(&client, &account, &receipt, as_of.as_deref(), json).await,
    }
}
