//! Ticket price calculation.
//!
//! A seat's price is the showing's base price plus the seat type's
//! percentage premium, computed with `rust_decimal` and rounded half-up
//! to the currency's minor unit.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AppError, AppResult};

/// Monetary values carry 2 decimal places, rounded half-up.
const DECIMAL_PLACES: u32 = 2;

/// `base_price * (1 + premium_percent / 100)`, rounded to 2 decimal
/// places. Pure; rejects negative inputs as `InvalidInput`.
pub fn ticket_price(base_price: Decimal, premium_percent: i32) -> AppResult<Decimal> {
    if base_price < Decimal::ZERO {
        return Err(AppError::InvalidInput(format!(
            "base price must be non-negative, got {base_price}"
        )));
    }
    if premium_percent < 0 {
        return Err(AppError::InvalidInput(format!(
            "premium percent must be non-negative, got {premium_percent}"
        )));
    }

    let premium = Decimal::from(premium_percent) / Decimal::ONE_HUNDRED;
    let price = base_price * (Decimal::ONE + premium);

    Ok(price.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
}
