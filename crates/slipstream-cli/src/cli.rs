//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Slipstream - Receipt-to-ledger reconciliation
#[derive(Parser)]
#[command(name = "slipstream")]
#[command(about = "Post parsed receipts into your budget ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List ledger accounts, categories, and payees
    Info,

    /// Reconcile a parsed receipt into a ledger transaction
    Reconcile {
        /// Parsed receipt JSON file
        #[arg(short, long)]
        receipt: PathBuf,

        /// Ledger account name to post against
        #[arg(short, long)]
        account: String,

        /// Override "today" for the date-sanity window (YYYY-MM-DD)
        ///
        /// Useful for reprocessing a backlog of receipts without the
        /// 5-year window drifting between runs.
        #[arg(long)]
        as_of: Option<String>,

        /// Print the outcome as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}
