//! Data models for Slipstream
//!
//! Receipt types keep the upstream parser's camelCase JSON field names so
//! parsed-receipt files round-trip unchanged. Ledger entity and request
//! types follow the budget provider's wire format.

use serde::{Deserialize, Serialize};

use crate::dates::DateAdjustment;

/// A parsed purchase receipt, produced by the external parsing subsystem
/// and consumed read-only by the reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub merchant: String,
    /// Calendar date, `YYYY-MM-DD`, no time zone
    pub transaction_date: String,
    pub memo: String,
    /// Signed; positive means money spent
    pub total_amount: f64,
    /// Non-negative tax already included inside `total_amount`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_taxes: Option<f64>,
    /// Fallback category when no usable split exists
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<ReceiptLineItem>>,
}

/// One categorized line of a receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLineItem {
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    pub line_item_total_amount: f64,
    pub category: String,
}

/// A budget account as reported by the ledger provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub deleted: bool,
}

/// A budget category as reported by the ledger provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub deleted: bool,
}

/// A payee as reported by the ledger provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
}

/// Create-transaction request sent to the ledger provider
///
/// Carries either `category_id` (plain transaction) or `subtransactions`
/// (two or more entries), never both.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub account_id: String,
    /// Milliunits, ledger sign convention (expenses negative)
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub date: chrono::NaiveDate,
    pub payee_name: String,
    pub memo: String,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtransactions: Option<Vec<NewSubTransaction>>,
}

/// One category slice of a split transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSubTransaction {
    /// Milliunits, same sign convention as the parent amount
    pub amount: i64,
    pub category_id: String,
}

/// Kind of amount adjustment applied while reconciling a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    TaxDistribution,
    ProportionalAdjustment,
    Tolerance,
}

/// The arithmetic behind a successful split, for user-facing feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitBreakdown {
    /// Sum of line-item amounts before tax distribution or adjustment
    pub original_split_total: f64,
    /// Tax distributed across the lines (magnitude)
    pub tax_amount: f64,
    /// Residual correction applied to match the receipt total
    pub final_adjustment: f64,
}

/// Report of a split attempt, returned alongside the created transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitInfo {
    pub attempted: bool,
    pub successful: bool,
    /// Number of distinct categories split across
    pub split_count: usize,
    /// Actual sum of split line items, before tax or adjustment (decimal,
    /// ledger sign)
    pub total_split_amount: f64,
    /// What the split total had to reach (decimal, ledger sign)
    pub expected_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_distributed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_applied: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_type: Option<AdjustmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_breakdown: Option<SplitBreakdown>,
    /// Present only when `successful` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of a reconcile run: the transaction was created, and these are
/// the facts a caller should surface about how.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    pub success: bool,
    /// Omitted entirely when the receipt carried no line items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_info: Option<SplitInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_adjustment: Option<DateAdjustment>,
}
