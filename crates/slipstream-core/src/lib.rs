//! Slipstream Core Library
//!
//! Shared functionality for the Slipstream receipt-to-ledger tool:
//! - Milliunit money arithmetic with the expense-negative sign rule
//! - Transaction-date sanity clamping
//! - Split allocation with proportional tax distribution and exact
//!   rounding reconciliation
//! - Ledger reference data snapshots and name resolution
//! - Reconciliation orchestration over pluggable ledger backends

pub mod dates;
pub mod error;
pub mod ledger;
pub mod models;
pub mod money;
pub mod reconcile;
pub mod resolve;
pub mod split;

pub use dates::DateAdjustment;
pub use error::{Error, Result};
pub use ledger::{HttpLedgerBackend, LedgerClient, LedgerProvider, MockLedgerBackend};
pub use models::{
    Account, AdjustmentType, Category, NewSubTransaction, NewTransaction, Payee, Receipt,
    ReceiptLineItem, ReconcileOutcome, SplitBreakdown, SplitInfo,
};
pub use reconcile::Reconciler;
pub use resolve::RefData;
pub use split::{allocate_splits, SplitAttempt, SPLIT_TOLERANCE};
