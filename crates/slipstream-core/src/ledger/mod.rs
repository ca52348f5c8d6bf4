//! Pluggable budget ledger backend abstraction
//!
//! The reconciliation engine depends on four ledger operations: list
//! accounts, list categories, list payees, and create one transaction.
//!
//! # Architecture
//!
//! - `LedgerProvider` trait: defines the interface for all ledger operations
//! - `LedgerClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HttpLedgerBackend`, `MockLedgerBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `LEDGER_BACKEND`: Backend to use (http, mock). Default: http
//! - `LEDGER_HOST`: Budget API base URL (default: https://api.ynab.com/v1)
//! - `LEDGER_BUDGET_ID`: Budget to operate on (required for http backend)
//! - `LEDGER_API_TOKEN`: Bearer token (required for http backend)
//! - `LEDGER_CATEGORY_GROUPS`: Optional comma-separated category group
//!   allowlist; when set, only categories in those groups are offered

mod http;
mod mock;

pub use http::HttpLedgerBackend;
pub use mock::MockLedgerBackend;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Account, Category, NewTransaction, Payee};

/// Trait defining the interface for all ledger backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait LedgerProvider: Send + Sync {
    /// List budget accounts, including closed/deleted ones (filtering is
    /// the resolver's job)
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// List budget categories, including hidden/deleted ones
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// List payees, including deleted ones
    async fn list_payees(&self) -> Result<Vec<Payee>>;

    /// Create one transaction. Not retried here; submission failures
    /// surface to the caller as-is.
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<()>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete ledger client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum LedgerClient {
    /// Budget REST API backend
    Http(HttpLedgerBackend),
    /// Mock backend for testing
    Mock(MockLedgerBackend),
}

impl LedgerClient {
    /// Create a ledger client from environment variables
    ///
    /// Checks `LEDGER_BACKEND` to determine which backend to use:
    /// - `http` (default): Uses LEDGER_HOST, LEDGER_BUDGET_ID, LEDGER_API_TOKEN
    /// - `mock`: Creates an empty mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("LEDGER_BACKEND").unwrap_or_else(|_| "http".to_string());

        match backend.to_lowercase().as_str() {
            "http" | "ynab" => HttpLedgerBackend::from_env().map(LedgerClient::Http),
            "mock" => Some(LedgerClient::Mock(MockLedgerBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown LEDGER_BACKEND, falling back to http");
                HttpLedgerBackend::from_env().map(LedgerClient::Http)
            }
        }
    }

    /// Create an HTTP backend directly
    pub fn http(host: &str, budget_id: &str, token: &str) -> Self {
        LedgerClient::Http(HttpLedgerBackend::new(host, budget_id, token))
    }

    /// Create an empty mock backend for testing
    pub fn mock() -> Self {
        LedgerClient::Mock(MockLedgerBackend::new())
    }
}

impl From<MockLedgerBackend> for LedgerClient {
    fn from(backend: MockLedgerBackend) -> Self {
        LedgerClient::Mock(backend)
    }
}

// Implement LedgerProvider for LedgerClient by delegating to the inner backend
#[async_trait]
impl LedgerProvider for LedgerClient {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        match self {
            LedgerClient::Http(b) => b.list_accounts().await,
            LedgerClient::Mock(b) => b.list_accounts().await,
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        match self {
            LedgerClient::Http(b) => b.list_categories().await,
            LedgerClient::Mock(b) => b.list_categories().await,
        }
    }

    async fn list_payees(&self) -> Result<Vec<Payee>> {
        match self {
            LedgerClient::Http(b) => b.list_payees().await,
            LedgerClient::Mock(b) => b.list_payees().await,
        }
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<()> {
        match self {
            LedgerClient::Http(b) => b.create_transaction(transaction).await,
            LedgerClient::Mock(b) => b.create_transaction(transaction).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            LedgerClient::Http(b) => b.health_check().await,
            LedgerClient::Mock(b) => b.health_check().await,
        }
    }

    fn host(&self) -> &str {
        match self {
            LedgerClient::Http(b) => b.host(),
            LedgerClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_client_mock() {
        let client = LedgerClient::mock();
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = LedgerClient::mock();
        assert!(client.health_check().await);
    }
}
