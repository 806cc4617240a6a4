//! Quote

use std::io;

use rusty_money::{Money, MoneyError};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    prices::Price,
    pricing::{PaymentMethod, PricingError},
};

/// Priced breakdown of a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub(super) subtotal: Price,
    pub(super) coupon: Option<String>,
    pub(super) coupon_discount: Price,
    pub(super) shipping: Price,
    pub(super) services: Price,
    pub(super) payment_discount: Price,
    pub(super) total: Price,
    pub(super) payment: Option<PaymentMethod>,
}

impl Quote {
    /// Product subtotal before any discount
    pub fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// Code of the applied coupon
    pub fn coupon(&self) -> Option<&str> {
        self.coupon.as_deref()
    }

    /// Amount the coupon takes off
    pub fn coupon_discount(&self) -> Price {
        self.coupon_discount
    }

    /// Shipping charged
    pub fn shipping(&self) -> Price {
        self.shipping
    }

    /// Whether shipping is free.
    pub fn free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }

    /// Installation and measurement fees
    pub fn services(&self) -> Price {
        self.services
    }

    /// Amount the payment method takes off
    pub fn payment_discount(&self) -> Price {
        self.payment_discount
    }

    /// Amount to pay
    pub fn total(&self) -> Price {
        self.total
    }

    /// Payment method the quote was priced for
    pub fn payment(&self) -> Option<PaymentMethod> {
        self.payment
    }

    /// Coupon and payment discounts combined.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn savings(&self) -> Result<Price, MoneyError> {
        self.coupon_discount.add(self.payment_discount)
    }

    /// Split the total into `count` credit card installments.
    ///
    /// Every installment is the total divided evenly; the last one absorbs the remainder.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InstallmentsNotAllowed`]: the quote is not for a credit card payment.
    /// - [`PricingError::InvalidInstallments`]: `count` is outside `1..=max`.
    pub fn installments(&self, count: u32, max: u32) -> Result<Vec<Price>, PricingError> {
        if count > 1 && self.payment != Some(PaymentMethod::Credit) {
            return Err(PricingError::InstallmentsNotAllowed);
        }

        if count == 0 || count > max {
            return Err(PricingError::InvalidInstallments {
                requested: count,
                max,
            });
        }

        let total = self.total.to_minor_units();
        let currency = self.total.currency();
        let each = total / i64::from(count);
        let last = total - each * i64::from(count - 1);

        let mut installments: Vec<Price> = (1..count)
            .map(|_| Money::from_minor(each, currency))
            .collect();

        installments.push(Money::from_minor(last, currency));

        Ok(installments)
    }

    /// Write the quote as a table.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if writing fails.
    pub fn write_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["Subtotal".to_string(), format!("{}", self.subtotal)]);

        if let Some(code) = &self.coupon {
            builder.push_record([format!("Cupom {code}"), format!("-{}", self.coupon_discount)]);
        }

        let shipping = if self.free_shipping() {
            "Grátis".to_string()
        } else {
            format!("{}", self.shipping)
        };

        builder.push_record(["Frete".to_string(), shipping]);

        if self.services.to_minor_units() > 0 {
            builder.push_record(["Serviços".to_string(), format!("{}", self.services)]);
        }

        if self.payment_discount.to_minor_units() > 0 {
            builder.push_record([
                "Desconto PIX".to_string(),
                format!("-{}", self.payment_discount),
            ]);
        }

        builder.push_record(["Total".to_string(), format!("{}", self.total)]);

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..2), Alignment::right());

        writeln!(out, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        prices::brl,
        pricing::{QuoteRequest, PricingConfig, quote},
    };

    use super::*;

    fn test_quote(payment: Option<PaymentMethod>) -> Result<Quote, PricingError> {
        quote(
            brl(100_000),
            None,
            &QuoteRequest {
                payment,
                ..QuoteRequest::default()
            },
            &PricingConfig::default(),
        )
    }

    #[test]
    fn installments_split_total_with_remainder_last() -> TestResult {
        let quote = Quote {
            total: brl(10_000),
            ..test_quote(Some(PaymentMethod::Credit))?
        };

        let installments = quote.installments(3, 12)?;

        assert_eq!(installments, [brl(3_333), brl(3_333), brl(3_334)]);

        Ok(())
    }

    #[test]
    fn installments_reject_out_of_range_counts() -> TestResult {
        let quote = test_quote(Some(PaymentMethod::Credit))?;

        assert_eq!(
            quote.installments(0, 12),
            Err(PricingError::InvalidInstallments {
                requested: 0,
                max: 12
            })
        );
        assert!(quote.installments(13, 12).is_err());

        Ok(())
    }

    #[test]
    fn installments_only_for_credit() -> TestResult {
        let quote = test_quote(Some(PaymentMethod::Pix))?;

        assert_eq!(
            quote.installments(2, 12),
            Err(PricingError::InstallmentsNotAllowed)
        );
        assert_eq!(quote.installments(1, 12)?, [quote.total()]);

        Ok(())
    }

    #[test]
    fn installments_need_a_payment_method() -> TestResult {
        let quote = test_quote(None)?;

        assert_eq!(
            quote.installments(3, 12),
            Err(PricingError::InstallmentsNotAllowed)
        );
        assert_eq!(quote.installments(1, 12)?, [quote.total()]);

        Ok(())
    }

    #[test]
    fn savings_adds_both_discounts() -> TestResult {
        let quote = test_quote(Some(PaymentMethod::Pix))?;

        assert_eq!(quote.savings()?, brl(5_000));

        Ok(())
    }

    #[test]
    fn write_to_lists_lines() -> TestResult {
        let quote = test_quote(Some(PaymentMethod::Pix))?;
        let mut out = Vec::new();

        quote.write_to(&mut out)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Subtotal"));
        assert!(text.contains("Grátis"));
        assert!(text.contains("Desconto PIX"));
        assert!(!text.contains("Cupom"));

        Ok(())
    }
}
