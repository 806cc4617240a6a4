//! Pricing
//!
//! One pricing function shared by the cart summary and checkout:
//!
//! 1. coupon discount on the product subtotal
//! 2. shipping, free when the product subtotal is above the threshold
//! 3. flat fees for installation and measurement services
//! 4. PIX discount on everything above
//!
//! Worked example: two units at R$ 100,00 with `FRETE20` is a R$ 40,00
//! discount plus R$ 29,90 shipping, R$ 189,90 in total.

use rust_decimal::Decimal;
use rusty_money::{MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    coupons::Coupon,
    discounts::{DiscountError, discount_on},
    prices::{Price, PriceError, from_major, non_negative, zero},
};

mod quote;

pub use quote::Quote;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A configured amount cannot be represented in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    InvalidAmount(Decimal),

    /// Installment count outside `1..=max`.
    #[error("{requested} installments requested, between 1 and {max} allowed")]
    InvalidInstallments {
        /// Requested count
        requested: u32,
        /// Configured maximum
        max: u32,
    },

    /// Installments are only available for credit card payments.
    #[error("installments are only available for credit card payments")]
    InstallmentsNotAllowed,

    /// Percentage arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit card, optionally in installments
    #[default]
    Credit,

    /// Debit card
    Debit,

    /// PIX instant transfer, discounted
    Pix,
}

/// Optional add-on services booked at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Services {
    /// Professional installation
    pub installation: bool,

    /// Technical measurement visit
    pub measurement: bool,
}

/// What to price besides the cart contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteRequest {
    /// Add-on services
    pub services: Services,

    /// Payment method, unknown until the payment step
    pub payment: Option<PaymentMethod>,
}

/// Pricing rules, in major units of the cart currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Shipping is free when the product subtotal is strictly above this
    pub free_shipping_threshold: Decimal,

    /// Flat shipping fee below the threshold
    pub shipping_fee: Decimal,

    /// Flat installation fee
    pub installation_fee: Decimal,

    /// Flat measurement visit fee
    pub measurement_fee: Decimal,

    /// Fraction taken off PIX payments
    pub pix_discount: Decimal,

    /// Maximum credit card installments
    pub max_installments: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::new(29_900, 2),
            shipping_fee: Decimal::new(2_990, 2),
            installation_fee: Decimal::new(15_000, 2),
            measurement_fee: Decimal::ZERO,
            pix_discount: Decimal::new(5, 2),
            max_installments: 12,
        }
    }
}

impl PricingConfig {
    fn amount(amount: Decimal, currency: &'static Currency) -> Result<Price, PricingError> {
        from_major(amount, currency).map_err(|_overflow| PricingError::InvalidAmount(amount))
    }

    /// Shipping charged on a product subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidAmount`] if the configured amounts overflow.
    pub fn shipping_for(&self, subtotal: &Price) -> Result<Price, PricingError> {
        let currency = subtotal.currency();
        let threshold = Self::amount(self.free_shipping_threshold, currency)?;

        if subtotal.to_minor_units() > threshold.to_minor_units() {
            Ok(zero(currency))
        } else {
            Self::amount(self.shipping_fee, currency)
        }
    }

    /// Fees for the requested services.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the configured amounts overflow.
    pub fn services_for(
        &self,
        services: Services,
        currency: &'static Currency,
    ) -> Result<Price, PricingError> {
        let mut total = zero(currency);

        if services.installation {
            total = total.add(Self::amount(self.installation_fee, currency)?)?;
        }

        if services.measurement {
            total = total.add(Self::amount(self.measurement_fee, currency)?)?;
        }

        Ok(total)
    }

    /// Discount taken off `amount` for the given payment method.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the percentage calculation overflows.
    pub fn payment_discount_for(
        &self,
        amount: &Price,
        payment: Option<PaymentMethod>,
    ) -> Result<Price, PricingError> {
        match payment {
            Some(PaymentMethod::Pix) => Ok(discount_on(amount, &self.pix_discount.into())?),
            Some(PaymentMethod::Credit | PaymentMethod::Debit) | None => {
                Ok(zero(amount.currency()))
            }
        }
    }
}

/// Price a product subtotal.
///
/// # Errors
///
/// Returns a [`PricingError`] if any money arithmetic fails.
pub fn quote(
    subtotal: Price,
    coupon: Option<&Coupon>,
    request: &QuoteRequest,
    config: &PricingConfig,
) -> Result<Quote, PricingError> {
    let currency = subtotal.currency();

    let coupon_discount = match coupon {
        Some(coupon) => discount_on(&subtotal, coupon.discount())?,
        None => zero(currency),
    };

    let shipping = config.shipping_for(&subtotal)?;
    let services = config.services_for(request.services, currency)?;

    let before_payment = non_negative(
        subtotal
            .sub(coupon_discount)?
            .add(shipping)?
            .add(services)?,
    );

    let payment_discount = config.payment_discount_for(&before_payment, request.payment)?;
    let total = before_payment.sub(payment_discount)?;

    Ok(Quote {
        subtotal,
        coupon: coupon.map(|coupon| coupon.code().to_string()),
        coupon_discount,
        shipping,
        services,
        payment_discount,
        total,
        payment: request.payment,
    })
}
