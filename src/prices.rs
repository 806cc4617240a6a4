//! Prices

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

/// A monetary amount in one of the store currencies.
pub type Price = Money<'static, Currency>;

/// The currency the storefront trades in unless told otherwise.
pub const DEFAULT_CURRENCY: &Currency = iso::BRL;

/// Errors raised by price arithmetic.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// A multiplication or sum did not fit in minor units.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Builds a price in the default currency from minor units (centavos).
pub fn brl(minor: i64) -> Price {
    Money::from_minor(minor, DEFAULT_CURRENCY)
}

/// Builds a price from an amount in major units, e.g. `129.90`.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if the amount does not fit in minor units.
pub fn from_major(amount: Decimal, currency: &'static Currency) -> Result<Price, PriceError> {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or(PriceError::Overflow)?;

    Ok(Money::from_minor(minor, currency))
}

/// A zero amount in the given currency.
pub fn zero(currency: &'static Currency) -> Price {
    Money::from_minor(0, currency)
}

/// Multiplies a unit price by a quantity.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if the result does not fit in minor units.
pub fn times(price: &Price, quantity: u32) -> Result<Price, PriceError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PriceError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Returns the larger of zero and `price`.
pub fn non_negative(price: Price) -> Price {
    if price.to_minor_units() < 0 {
        zero(price.currency())
    } else {
        price
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn brl_uses_default_currency() {
        let price = brl(2990);

        assert_eq!(price.currency(), DEFAULT_CURRENCY);
        assert_eq!(price.to_minor_units(), 2990);
    }

    #[test]
    fn times_multiplies_minor_units() -> TestResult {
        let price = Money::from_minor(12_990, USD);

        assert_eq!(times(&price, 3)?, Money::from_minor(38_970, USD));

        Ok(())
    }

    #[test]
    fn times_zero_is_zero() -> TestResult {
        assert_eq!(times(&brl(500), 0)?, brl(0));

        Ok(())
    }

    #[test]
    fn times_overflow_returns_error() {
        let price = brl(i64::MAX);

        assert_eq!(times(&price, 2), Err(PriceError::Overflow));
    }

    #[test]
    fn from_major_converts_to_minor_units() -> TestResult {
        assert_eq!(from_major(Decimal::new(12_990, 2), DEFAULT_CURRENCY)?, brl(12_990));
        assert_eq!(from_major(Decimal::new(299, 0), DEFAULT_CURRENCY)?, brl(29_900));
        assert_eq!(
            from_major(Decimal::MAX, DEFAULT_CURRENCY),
            Err(PriceError::Overflow)
        );

        Ok(())
    }

    #[test]
    fn non_negative_clamps_at_zero() {
        assert_eq!(non_negative(brl(-10)), brl(0));
        assert_eq!(non_negative(brl(10)), brl(10));
    }
}
