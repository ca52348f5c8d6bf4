//! Transaction date validation
//!
//! Receipt parsers misread dates often enough that we clamp every
//! transaction date into a sane window before it reaches the ledger:
//! nothing in the future, nothing more than 5 years back. Adjustments are
//! reported, never silent.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Oldest acceptable transaction age, in months.
const MAX_AGE_MONTHS: u32 = 60;

/// Report of a date clamp applied during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateAdjustment {
    pub original_date: NaiveDate,
    pub adjusted_date: NaiveDate,
    pub reason: String,
}

/// Parse a calendar date string (`YYYY-MM-DD`) from a parsed receipt.
///
/// Malformed dates are a caller contract violation and fail fast here,
/// before any clamping or ledger work happens.
pub fn parse_transaction_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Clamp a transaction date into the acceptable window.
///
/// `today` is injected so the function stays pure and testable. Today
/// itself is acceptable; strictly-future dates clamp to today, and dates
/// before `today - 5 years` clamp to exactly that bound.
pub fn clamp_transaction_date(
    date: NaiveDate,
    today: NaiveDate,
) -> (NaiveDate, Option<DateAdjustment>) {
    if date > today {
        return (
            today,
            Some(DateAdjustment {
                original_date: date,
                adjusted_date: today,
                reason: "Date was in the future".to_string(),
            }),
        );
    }

    let oldest = today - Months::new(MAX_AGE_MONTHS);
    if date < oldest {
        return (
            oldest,
            Some(DateAdjustment {
                original_date: date,
                adjusted_date: oldest,
                reason: "Date was more than 5 years ago".to_string(),
            }),
        );
    }

    (date, None)
}
