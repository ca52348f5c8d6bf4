//! Milliunit money arithmetic
//!
//! The ledger stores amounts as signed integers counting thousandths of the
//! major currency unit, with expenses negative. Receipts arrive with the
//! opposite convention (positive = money spent), so conversion flips the
//! sign. This module is the only place that sign rule lives.

/// Milliunits per major currency unit.
pub const MILLIUNITS_PER_UNIT: f64 = 1000.0;

/// Convert a decimal receipt amount to ledger milliunits.
///
/// Truncates toward zero rather than rounding. The split allocator depends
/// on that truncation bias being deterministic: per-line remainders are
/// corrected explicitly, never rounded away.
pub fn to_milliunits(amount: f64) -> i64 {
    (-amount * MILLIUNITS_PER_UNIT).trunc() as i64
}

/// Convert a ledger milliunit amount back to a decimal, keeping the ledger
/// sign (expenses stay negative).
pub fn from_milliunits(milliunits: i64) -> f64 {
    milliunits as f64 / MILLIUNITS_PER_UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_is_negative() {
        assert_eq!(to_milliunits(107.00), -107_000);
        assert_eq!(to_milliunits(-12.50), 12_500);
        assert_eq!(to_milliunits(0.0), 0);
    }

    #[test]
    fn test_truncates_toward_zero() {
        // 9.4649 -> -9464.9 -> truncated, not rounded
        assert_eq!(to_milliunits(9.4649), -9_464);
        assert_eq!(to_milliunits(-9.4649), 9_464);
        // Parser output can carry sub-milliunit precision
        assert_eq!(to_milliunits(0.0009), 0);
    }

    #[test]
    fn test_from_milliunits_keeps_ledger_sign() {
        assert_eq!(from_milliunits(-107_000), -107.0);
        assert_eq!(from_milliunits(9_460), 9.46);
    }
}
