//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `info` - Ledger reference data listing
//! - `reconcile` - Receipt reconciliation workflow

pub mod info;
pub mod reconcile;

// Re-export command functions for main.rs
pub use info::*;
pub use reconcile::*;
