//! Budget REST API backend
//!
//! HTTP client for a YNAB-style budget API. All requests are scoped to one
//! budget; categories arrive grouped and are flattened here, optionally
//! restricted to an allowlisted set of category groups.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Account, Category, NewTransaction, Payee};

use super::LedgerProvider;

const DEFAULT_HOST: &str = "https://api.ynab.com/v1";

/// Budget API backend
#[derive(Clone)]
pub struct HttpLedgerBackend {
    http_client: Client,
    base_url: String,
    budget_id: String,
    token: String,
    /// When set, only categories inside these groups are offered
    allowed_groups: Option<Vec<String>>,
}

impl HttpLedgerBackend {
    /// Create a new budget API backend
    pub fn new(base_url: &str, budget_id: &str, token: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            budget_id: budget_id.to_string(),
            token: token.to_string(),
            allowed_groups: None,
        }
    }

    /// Restrict category listing to the given category groups
    pub fn with_allowed_groups(mut self, groups: Vec<String>) -> Self {
        self.allowed_groups = Some(groups);
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let budget_id = std::env::var("LEDGER_BUDGET_ID").ok()?;
        let token = std::env::var("LEDGER_API_TOKEN").ok()?;
        let host = std::env::var("LEDGER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let mut backend = Self::new(&host, &budget_id, &token);
        if let Ok(groups) = std::env::var("LEDGER_CATEGORY_GROUPS") {
            let groups: Vec<String> = groups
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect();
            if !groups.is_empty() {
                backend = backend.with_allowed_groups(groups);
            }
        }
        Some(backend)
    }

    fn budget_url(&self, path: &str) -> String {
        format!("{}/budgets/{}/{}", self.base_url, self.budget_id, path)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.budget_url(path);
        debug!(%url, "ledger GET");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

/// Response envelope wrapping every budget API payload
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AccountsData {
    accounts: Vec<Account>,
}

#[derive(Debug, Deserialize)]
struct CategoryGroupsData {
    category_groups: Vec<CategoryGroup>,
}

#[derive(Debug, Deserialize)]
struct CategoryGroup {
    name: String,
    #[serde(default)]
    deleted: bool,
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct PayeesData {
    payees: Vec<Payee>,
}

/// Create-transaction request body
#[derive(Debug, Serialize)]
struct CreateTransactionBody<'a> {
    transaction: &'a NewTransaction,
}

/// Error detail shape returned by the budget API
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    name: String,
    detail: String,
}

async fn provider_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => format!(
            "{} ({}): {}",
            envelope.error.name, status, envelope.error.detail
        ),
        Err(_) => format!("HTTP {}: {}", status, body),
    };
    warn!(%status, "ledger API request failed");
    Error::Provider(message)
}

#[async_trait]
impl LedgerProvider for HttpLedgerBackend {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let data: AccountsData = self.get("accounts").await?;
        Ok(data.accounts)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let data: CategoryGroupsData = self.get("categories").await?;

        let categories = data
            .category_groups
            .into_iter()
            .filter(|group| !group.deleted)
            .filter(|group| match &self.allowed_groups {
                Some(allowed) => allowed.iter().any(|name| *name == group.name),
                None => true,
            })
            .flat_map(|group| group.categories)
            .collect();

        Ok(categories)
    }

    async fn list_payees(&self) -> Result<Vec<Payee>> {
        let data: PayeesData = self.get("payees").await?;
        Ok(data.payees)
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<()> {
        let url = self.budget_url("transactions");
        debug!(%url, amount = transaction.amount, "submitting transaction");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&CreateTransactionBody { transaction })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let url = self.budget_url("settings");
        match self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_url_scoping() {
        let backend = HttpLedgerBackend::new("https://api.ynab.com/v1/", "budget-1", "token");
        assert_eq!(
            backend.budget_url("transactions"),
            "https://api.ynab.com/v1/budgets/budget-1/transactions"
        );
    }

    #[test]
    fn test_envelope_deserialization() {
        let json = r#"{"data": {"accounts": [
            {"id": "a1", "name": "Checking", "closed": false, "deleted": false}
        ]}}"#;
        let envelope: Envelope<AccountsData> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.accounts.len(), 1);
        assert_eq!(envelope.data.accounts[0].name, "Checking");
    }

    #[test]
    fn test_category_group_shape() {
        let json = r#"{"data": {"category_groups": [
            {"id": "g1", "name": "Everyday", "deleted": false, "categories": [
                {"id": "c1", "name": "Groceries", "hidden": false, "deleted": false}
            ]}
        ]}}"#;
        let envelope: Envelope<CategoryGroupsData> = serde_json::from_str(json).unwrap();
        let group = &envelope.data.category_groups[0];
        assert_eq!(group.name, "Everyday");
        assert_eq!(group.categories[0].name, "Groceries");
    }
}
