//! Exact currency helpers.
//!
//! Amounts are stored as integer cents and handled as `Decimal` everywhere else.
//! Converting an amount with more than two decimal places is an error rather than
//! a silent rounding.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Converts stored cents to a decimal amount with two decimal places.
#[must_use]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Converts a decimal amount to cents.
///
/// # Errors
/// Returns `InvalidAmount` if the amount has sub-cent precision or does not fit in `i64`.
pub fn to_cents(amount: Decimal) -> Result<i64> {
    if amount.normalize().scale() > 2 {
        return Err(Error::InvalidAmount { amount });
    }

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or(Error::InvalidAmount { amount })
}

/// Converts a decimal amount to cents, requiring it to be strictly positive.
///
/// # Errors
/// Returns `InvalidAmount` for zero or negative amounts and for anything `to_cents` rejects.
pub fn to_positive_cents(amount: Decimal) -> Result<i64> {
    let cents = to_cents(amount)?;
    if cents <= 0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(cents)
}

/// Splits `total_cents` into `parts` slices that sum exactly to the total.
///
/// Every slice gets the truncated quotient; the remainder goes to the last slice.
/// Returns an empty vector when `parts` is zero.
#[must_use]
pub fn split_evenly(total_cents: i64, parts: usize) -> Vec<i64> {
    let Ok(divisor) = i64::try_from(parts) else {
        return Vec::new();
    };
    if divisor == 0 {
        return Vec::new();
    }

    let base = total_cents / divisor;
    let remainder = total_cents - base * divisor;

    let mut slices = vec![base; parts];
    if let Some(last) = slices.last_mut() {
        *last += remainder;
    }
    slices
}

/// Parses a typed amount such as `12.50`, `12,50` or `$1,200.00`.
///
/// # Errors
/// Returns `Validation` if the text is not a number.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let cleaned = input.trim().trim_start_matches('$').trim();
    // A lone comma is a decimal separator, otherwise commas group thousands
    let normalized = if cleaned.matches(',').count() == 1 && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else {
        cleaned.replace(',', "")
    };

    normalized
        .parse::<Decimal>()
        .map_err(|_| Error::Validation {
            message: format!("'{input}' is not a valid amount"),
        })
}
