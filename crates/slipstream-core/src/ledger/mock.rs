//! Mock backend for testing
//!
//! In-memory ledger with seedable reference data. Records every submitted
//! transaction so tests can assert on exactly what would have been posted,
//! and can be told to reject submissions to exercise the failure path.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Account, Category, NewTransaction, Payee};

use super::LedgerProvider;

/// Mock ledger backend for testing
#[derive(Clone, Default)]
pub struct MockLedgerBackend {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    payees: Vec<Payee>,
    created: Arc<Mutex<Vec<NewTransaction>>>,
    fail_submissions: bool,
}

impl MockLedgerBackend {
    /// Create an empty mock ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed accounts
    pub fn with_accounts(mut self, accounts: Vec<Account>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Seed categories
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Seed payees
    pub fn with_payees(mut self, payees: Vec<Payee>) -> Self {
        self.payees = payees;
        self
    }

    /// Make create_transaction fail, for exercising provider errors
    pub fn with_failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    /// Transactions submitted so far, in order
    pub fn created_transactions(&self) -> Vec<NewTransaction> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerProvider for MockLedgerBackend {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn list_payees(&self) -> Result<Vec<Payee>> {
        Ok(self.payees.clone())
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<()> {
        if self.fail_submissions {
            return Err(Error::Provider(
                "mock ledger rejected the transaction".to_string(),
            ));
        }
        self.created.lock().unwrap().push(transaction.clone());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
