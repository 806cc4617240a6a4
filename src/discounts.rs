//! Discounts
//!
//! Percentage arithmetic shared by coupons and payment-method discounts.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::Money;
use thiserror::Error;

use crate::prices::Price;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Calculate `percent` of an amount expressed in minor units.
///
/// Rounds half away from zero, so 5% of R$ 0,10 is R$ 0,01.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage does not expose the inner Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// The discount amount `percent` takes off `price`.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn discount_on(price: &Price, percent: &Percentage) -> Result<Price, DiscountError> {
    let minor = percent_of_minor(percent, price.to_minor_units())?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Percentage points (e.g. `15`) for a fractional percentage (e.g. `0.15`).
pub fn percent_points(percent: &Percentage) -> Decimal {
    ((*percent) * Decimal::ONE_HUNDRED).normalize()
}
