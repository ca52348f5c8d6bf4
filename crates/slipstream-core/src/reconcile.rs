//! Reconciliation orchestration
//!
//! Builds one ledger transaction from a parsed receipt — split across
//! categories when the line items reconcile, single-category otherwise —
//! and submits it exactly once. A failed split is never fatal: the
//! transaction still posts against the receipt's top-level category, and
//! the failure is reported back as structured fact.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::dates::{clamp_transaction_date, parse_transaction_date};
use crate::error::Result;
use crate::ledger::{LedgerClient, LedgerProvider};
use crate::models::{NewTransaction, Receipt, ReconcileOutcome};
use crate::money;
use crate::resolve::RefData;
use crate::split;

/// Turns parsed receipts into ledger transactions
pub struct Reconciler<'a> {
    client: &'a LedgerClient,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a LedgerClient) -> Self {
        Self { client }
    }

    /// Reconcile a receipt using the system clock for the date window
    pub async fn reconcile(
        &self,
        account_name: &str,
        receipt: &Receipt,
    ) -> Result<ReconcileOutcome> {
        self.reconcile_as_of(account_name, receipt, Utc::now().date_naive())
            .await
    }

    /// Reconcile with an injected "today", fetching fresh reference data
    pub async fn reconcile_as_of(
        &self,
        account_name: &str,
        receipt: &Receipt,
        today: NaiveDate,
    ) -> Result<ReconcileOutcome> {
        let refs = RefData::fetch(self.client).await?;
        self.reconcile_with(&refs, account_name, receipt, today).await
    }

    /// Reconcile against an already-fetched reference snapshot
    pub async fn reconcile_with(
        &self,
        refs: &RefData,
        account_name: &str,
        receipt: &Receipt,
        today: NaiveDate,
    ) -> Result<ReconcileOutcome> {
        let account_id = refs.resolve_account(account_name)?;

        let parsed_date = parse_transaction_date(&receipt.transaction_date)?;
        let (date, date_adjustment) = clamp_transaction_date(parsed_date, today);

        // Attempt a split only when line items were supplied; split_info
        // stays absent entirely (not merely empty) otherwise
        let (split_info, subtransactions) = match receipt.line_items.as_deref() {
            Some(items) => {
                let attempt = split::allocate_splits(
                    receipt.total_amount,
                    receipt.total_taxes,
                    items,
                    refs,
                );
                (Some(attempt.info), attempt.subtransactions)
            }
            None => (None, Vec::new()),
        };

        // A single merged category collapses to a plain transaction; zero
        // entries (no split, or a failed one) fall back to the receipt's
        // top-level category
        let (category_id, subtransactions) = match subtransactions.len() {
            0 => (
                Some(refs.resolve_category(&receipt.category)?.to_string()),
                None,
            ),
            1 => (Some(subtransactions[0].category_id.clone()), None),
            _ => (None, Some(subtransactions)),
        };

        let transaction = NewTransaction {
            account_id: account_id.to_string(),
            amount: money::to_milliunits(receipt.total_amount),
            category_id,
            date,
            payee_name: receipt.merchant.clone(),
            memo: receipt.memo.clone(),
            approved: false,
            subtransactions,
        };

        debug!(
            account = %account_name,
            amount = transaction.amount,
            splits = transaction
                .subtransactions
                .as_ref()
                .map(|s| s.len())
                .unwrap_or(0),
            "submitting reconciled transaction"
        );
        self.client.create_transaction(&transaction).await?;
        info!(
            merchant = %receipt.merchant,
            amount = transaction.amount,
            date = %transaction.date,
            "transaction created"
        );

        Ok(ReconcileOutcome {
            success: true,
            split_info,
            date_adjustment,
        })
    }
}
