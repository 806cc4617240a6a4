//! Coupons
//!
//! Fixed table of promotional codes, each worth a percentage off the cart subtotal.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::discounts::percent_points;

/// Coupon errors.
#[derive(Debug, Error, PartialEq)]
pub enum CouponError {
    /// No coupon with this code exists.
    #[error("coupon {0} does not exist")]
    Unknown(String),

    /// Discount must be strictly between 0% and 100%.
    #[error("coupon {code} has an invalid discount of {points}%")]
    InvalidDiscount {
        /// Offending code
        code: String,
        /// Discount in percentage points
        points: Decimal,
    },
}

/// A coupon code and the fraction of the subtotal it takes off.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    code: String,
    discount: Percentage,
}

impl Coupon {
    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::InvalidDiscount`] unless `0 < discount < 1`.
    pub fn new(code: impl Into<String>, discount: Percentage) -> Result<Self, CouponError> {
        let code = code.into();
        let fraction = discount * Decimal::ONE;

        if fraction <= Decimal::ZERO || fraction >= Decimal::ONE {
            return Err(CouponError::InvalidDiscount {
                code,
                points: percent_points(&discount),
            });
        }

        Ok(Self { code, discount })
    }

    /// The code customers type in.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Fraction of the subtotal taken off.
    pub fn discount(&self) -> &Percentage {
        &self.discount
    }
}

/// Lookup table of the coupons currently on offer.
#[derive(Debug, Clone)]
pub struct CouponBook {
    coupons: FxHashMap<String, Coupon>,
}

impl CouponBook {
    /// A book with no coupons.
    pub fn empty() -> Self {
        Self {
            coupons: FxHashMap::default(),
        }
    }

    /// Add or replace a coupon.
    pub fn insert(&mut self, coupon: Coupon) -> Option<Coupon> {
        self.coupons.insert(coupon.code.clone(), coupon)
    }

    /// Exact, case-sensitive lookup.
    pub fn resolve(&self, code: &str) -> Option<&Coupon> {
        self.coupons.get(code)
    }

    /// Number of coupons.
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Whether the book has no coupons.
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    /// Coupons sorted by code.
    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        let mut coupons: Vec<&Coupon> = self.coupons.values().collect();
        coupons.sort_by(|a, b| a.code.cmp(&b.code));
        coupons.into_iter()
    }
}

impl Default for CouponBook {
    /// The storefront's launch coupons.
    fn default() -> Self {
        let mut book = Self::empty();

        for (code, points) in [("PRIMEIRA10", 10), ("FRETE20", 20), ("CASA15", 15)] {
            book.insert(Coupon {
                code: code.to_string(),
                discount: Percentage::from(Decimal::new(points, 2)),
            });
        }

        book
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_book_has_launch_coupons() {
        let book = CouponBook::default();

        let codes: Vec<&str> = book.iter().map(Coupon::code).collect();

        assert_eq!(codes, ["CASA15", "FRETE20", "PRIMEIRA10"]);
    }

    #[test]
    fn resolve_is_exact_match() {
        let book = CouponBook::default();

        let casa = book.resolve("CASA15").map(|coupon| percent_points(coupon.discount()));

        assert_eq!(casa, Some(Decimal::from(15)));
        assert!(book.resolve("casa15").is_none());
        assert!(book.resolve(" CASA15").is_none());
        assert!(book.resolve("XYZ").is_none());
    }

    #[test]
    fn new_rejects_out_of_range_discounts() {
        assert!(matches!(
            Coupon::new("ZERO", Percentage::from(Decimal::ZERO)),
            Err(CouponError::InvalidDiscount { .. })
        ));
        assert!(matches!(
            Coupon::new("FREE", Percentage::from(Decimal::ONE)),
            Err(CouponError::InvalidDiscount { .. })
        ));
    }

    #[test]
    fn insert_replaces_existing_code() -> TestResult {
        let mut book = CouponBook::default();

        let previous = book.insert(Coupon::new("CASA15", Percentage::from(Decimal::new(5, 2)))?);

        assert!(previous.is_some());
        assert_eq!(book.len(), 3);

        Ok(())
    }
}
