//! Ledger reference data and name resolution
//!
//! The engine never talks names to the ledger, only ids. `RefData` is the
//! per-request snapshot of account/category/payee lists with unusable
//! entries filtered out, plus exact (case-sensitive) name lookups. It is
//! built once per user-facing action and never cached across requests.

use tracing::debug;

use crate::error::{Error, Result};
use crate::ledger::{LedgerClient, LedgerProvider};
use crate::models::{Account, Category, Payee};

/// Filtered snapshot of the ledger's reference entities
#[derive(Debug, Clone, Default)]
pub struct RefData {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    payees: Vec<Payee>,
}

impl RefData {
    /// Build a snapshot from raw provider lists, dropping deleted/hidden
    /// categories, deleted payees, and closed/deleted accounts.
    pub fn new(accounts: Vec<Account>, categories: Vec<Category>, payees: Vec<Payee>) -> Self {
        let data = Self {
            accounts: accounts
                .into_iter()
                .filter(|a| !a.closed && !a.deleted)
                .collect(),
            categories: categories
                .into_iter()
                .filter(|c| !c.hidden && !c.deleted)
                .collect(),
            payees: payees.into_iter().filter(|p| !p.deleted).collect(),
        };
        debug!(
            accounts = data.accounts.len(),
            categories = data.categories.len(),
            payees = data.payees.len(),
            "built ledger reference snapshot"
        );
        data
    }

    /// Fetch and filter reference data from the ledger provider
    pub async fn fetch(client: &LedgerClient) -> Result<Self> {
        let accounts = client.list_accounts().await?;
        let categories = client.list_categories().await?;
        let payees = client.list_payees().await?;
        Ok(Self::new(accounts, categories, payees))
    }

    /// Exact-match category name -> id lookup
    pub fn category_id(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.as_str())
    }

    /// Exact-match account name -> id lookup
    pub fn account_id(&self, name: &str) -> Option<&str> {
        self.accounts
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.id.as_str())
    }

    /// Resolve an account name or fail with `AccountNotFound`
    pub fn resolve_account(&self, name: &str) -> Result<&str> {
        self.account_id(name)
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))
    }

    /// Resolve a category name or fail with `CategoryNotFound`
    pub fn resolve_category(&self, name: &str) -> Result<&str> {
        self.category_id(name)
            .ok_or_else(|| Error::CategoryNotFound(name.to_string()))
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn payees(&self) -> &[Payee] {
        &self.payees
    }
}
