//! Coupon Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    coupons::{Coupon, CouponBook},
    fixtures::{FixtureError, parse_percentage},
};

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Map of coupon code -> discount (e.g., "10%")
    pub coupons: FxHashMap<String, String>,
}

/// Parse a coupons fixture into a coupon book
///
/// # Errors
///
/// Returns an error if the YAML is invalid or a discount is malformed or out of range.
pub fn coupons_from_yaml(yaml: &str) -> Result<CouponBook, FixtureError> {
    let fixture: CouponsFixture = serde_norway::from_str(yaml)?;

    let mut book = CouponBook::empty();

    for (code, discount) in fixture.coupons {
        book.insert(Coupon::new(code, parse_percentage(&discount)?)?);
    }

    Ok(book)
}
