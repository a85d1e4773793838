//! Bounds for monetary amounts.
//!
//! Prices and order totals live in `DECIMAL(10, 2)` columns, so anything outside
//! `0..=99_999_999.99` or with more than two fractional digits is rejected before it reaches
//! the database.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Fractional digits a stored amount may carry
pub const MAX_SCALE: u32 = 2;

/// Largest amount a `DECIMAL(10, 2)` column holds
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, MAX_SCALE);

/// Checks that `amount` fits a `DECIMAL(10, 2)` column; `label` names it in the message.
///
/// # Errors
/// Returns [`Error::Validation`] for negative, oversized, or over-precise amounts.
pub fn check_amount(amount: Decimal, label: &str) -> Result<Decimal> {
    if amount < Decimal::ZERO {
        return Err(Error::validation(format!("{label} cannot be negative")));
    }
    if amount > MAX_AMOUNT {
        return Err(Error::validation(format!("{label} cannot exceed {MAX_AMOUNT}")));
    }
    if amount.round_dp(MAX_SCALE) != amount {
        return Err(Error::validation(format!(
            "{label} cannot have more than {MAX_SCALE} decimal places"
        )));
    }
    Ok(amount)
}

/// `price * quantity` rounded to cents, bounded like any stored amount.
///
/// Prices read back from a REAL column can carry float noise, hence the rounding.
///
/// # Errors
/// Returns [`Error::Validation`] when the product overflows or exceeds [`MAX_AMOUNT`].
pub fn line_total(price: Decimal, quantity: u32) -> Result<Decimal> {
    let total = price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| Error::validation("Total price is too large"))?
        .round_dp(MAX_SCALE);
    check_amount(total, "Total price")
}
