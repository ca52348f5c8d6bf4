//! Ledger reference data CLI command

use anyhow::{Context, Result};
use slipstream_core::{LedgerClient, RefData};

/// Fetch and list the ledger's usable accounts, categories, and payees
pub async fn cmd_info(client: &LedgerClient) -> Result<()> {
    let refs = RefData::fetch(client)
        .await
        .context("fetching ledger reference data")?;

    println!("\nAccounts ({})", refs.accounts().len());
    println!("{}", "─".repeat(40));
    for account in refs.accounts() {
        println!("  {}", account.name);
    }

    println!("\nCategories ({})", refs.categories().len());
    println!("{}", "─".repeat(40));
    for category in refs.categories() {
        println!("  {}", category.name);
    }

    println!("\nPayees ({})", refs.payees().len());
    println!("{}", "─".repeat(40));
    for payee in refs.payees() {
        println!("  {}", payee.name);
    }

    println!();
    Ok(())
}
