//! Cart
//!
//! Session cart: at most one entry per product, quantities of at least one,
//! and a single coupon slot.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    coupons::{Coupon, CouponBook, CouponError},
    prices::{DEFAULT_CURRENCY, Price, PriceError, zero},
    pricing::{PricingConfig, PricingError, Quote, QuoteRequest, quote},
    products::Product,
};

mod item;

pub use item::CartItem;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product's currency differs from the cart currency (product id, product currency, cart currency).
    #[error("product {0} is priced in {1}, but the cart is in {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// Quantities must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Quantity would not fit in a `u32`.
    #[error("quantity for product {0} overflowed")]
    QuantityOverflow(String),

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    ItemNotFound(String),

    /// Coupon lookup failed.
    #[error(transparent)]
    Coupon(#[from] CouponError),
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
    coupon: Option<Coupon>,
    currency: &'static Currency,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl Cart {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            coupon: None,
            currency,
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Adding a product that is already in the cart increments its quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::CurrencyMismatch`]: the product is priced in another currency.
    /// - [`CartError::QuantityOverflow`]: the new quantity does not fit.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> Result<&CartItem, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let id = product.id.clone();

        let index = match self.position(&id) {
            Some(index) => {
                let item = self
                    .items
                    .get_mut(index)
                    .ok_or_else(|| CartError::ItemNotFound(id.clone()))?;

                let quantity = item
                    .quantity()
                    .checked_add(quantity)
                    .ok_or_else(|| CartError::QuantityOverflow(id.clone()))?;

                item.set_quantity(quantity);

                index
            }
            None => {
                self.items.push(CartItem::new(product, quantity));

                self.items.len() - 1
            }
        };

        debug!(product = %id, quantity, "added to cart");

        self.items.get(index).ok_or(CartError::ItemNotFound(id))
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero; remove the item instead.
    /// - [`CartError::ItemNotFound`]: the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.product().id == product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;

        item.set_quantity(quantity);

        debug!(product = product_id, quantity, "updated cart quantity");

        Ok(())
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if the product is not in the cart.
    pub fn remove_item(&mut self, product_id: &str) -> Result<CartItem, CartError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;

        debug!(product = product_id, "removed from cart");

        Ok(self.items.remove(index))
    }

    /// Empty the cart and drop any applied coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;

        debug!("cleared cart");
    }

    /// Apply a coupon, replacing any coupon already applied.
    ///
    /// An unknown code leaves the current coupon in place.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::Unknown`] if `code` is not in `book`.
    pub fn apply_coupon(&mut self, code: &str, book: &CouponBook) -> Result<&Coupon, CartError> {
        let coupon = book
            .resolve(code)
            .ok_or_else(|| CouponError::Unknown(code.to_string()))?;

        debug!(code, "applied coupon");

        Ok(self.coupon.insert(coupon.clone()))
    }

    /// Remove the applied coupon, returning it.
    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        self.coupon.take()
    }

    /// The applied coupon, if any.
    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Sum of price times quantity over all items.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the sum overflows.
    pub fn subtotal(&self) -> Result<Price, PriceError> {
        self.items
            .iter()
            .try_fold(zero(self.currency), |total, item| {
                Ok(total.add(item.line_total()?)?)
            })
    }

    /// Total number of units across all items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Price the cart with the applied coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any money arithmetic fails.
    pub fn quote(&self, request: &QuoteRequest, config: &PricingConfig) -> Result<Quote, PricingError> {
        quote(self.subtotal()?, self.coupon(), request, config)
    }

    /// Get an item by product id.
    pub fn get_item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product().id == product_id)
    }

    /// Iterate over the items in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product().id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{prices::brl, products::tests::product};

    use super::*;

    fn expected_subtotal(cart: &Cart) -> i64 {
        cart.iter()
            .map(|item| item.unit_price().to_minor_units() * i64::from(item.quantity()))
            .sum()
    }

    #[test]
    fn add_item_inserts_new_entry() -> TestResult {
        let mut cart = Cart::default();

        let item = cart.add_item(product("1", 10_000), 2)?;

        assert_eq!(item.quantity(), 2);
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn add_item_twice_increments_quantity() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(product("1", 10_000), 1)?;
        cart.add_item(product("1", 10_000), 3)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item("1").map(CartItem::quantity), Some(4));
        assert_eq!(cart.item_count(), 4);

        Ok(())
    }

    #[test]
    fn add_item_zero_quantity_is_rejected() {
        let mut cart = Cart::default();

        let result = cart.add_item(product("1", 100), 0).err();

        assert_eq!(result, Some(CartError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_item_currency_mismatch_errors() {
        let mut cart = Cart::default();
        let mut dollars = product("1", 100);
        dollars.price = Money::from_minor(100, USD);

        let result = cart.add_item(dollars, 1).err();

        assert_eq!(
            result,
            Some(CartError::CurrencyMismatch("1".to_string(), "USD", "BRL"))
        );
    }

    #[test]
    fn add_item_overflowing_quantity_errors() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(product("1", 1), u32::MAX)?;

        let result = cart.add_item(product("1", 1), 1).err();

        assert_eq!(result, Some(CartError::QuantityOverflow("1".to_string())));
        assert_eq!(cart.get_item("1").map(CartItem::quantity), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn update_quantity_sets_quantity() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(product("1", 100), 5)?;
        cart.update_quantity("1", 2)?;

        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn update_quantity_to_zero_is_rejected() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(product("1", 100), 1)?;

        assert_eq!(cart.update_quantity("1", 0), Err(CartError::InvalidQuantity));
        assert_eq!(cart.get_item("1").map(CartItem::quantity), Some(1));

        Ok(())
    }

    #[test]
    fn update_quantity_unknown_product_errors() {
        let mut cart = Cart::default();

        assert_eq!(
            cart.update_quantity("9", 1),
            Err(CartError::ItemNotFound("9".to_string()))
        );
    }

    #[test]
    fn remove_item_deletes_entry() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(product("1", 100), 1)?;
        cart.add_item(product("2", 200), 1)?;

        let removed = cart.remove_item("1")?;

        assert_eq!(removed.product().id, "1");
        assert_eq!(cart.len(), 1);
        assert!(cart.remove_item("1").is_err());

        Ok(())
    }

    #[test]
    fn clear_empties_items_and_coupon() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(product("1", 100), 1)?;
        cart.apply_coupon("CASA15", &CouponBook::default())?;
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.coupon().is_none());
        assert_eq!(cart.subtotal()?, brl(0));

        Ok(())
    }

    #[test]
    fn subtotal_tracks_every_mutation() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(product("1", 12_990), 2)?;
        assert_eq!(cart.subtotal()?.to_minor_units(), expected_subtotal(&cart));

        cart.add_item(product("2", 4_550), 3)?;
        assert_eq!(cart.subtotal()?.to_minor_units(), expected_subtotal(&cart));

        cart.update_quantity("1", 1)?;
        assert_eq!(cart.subtotal()?.to_minor_units(), expected_subtotal(&cart));

        cart.add_item(product("1", 12_990), 4)?;
        assert_eq!(cart.subtotal()?.to_minor_units(), expected_subtotal(&cart));

        cart.remove_item("2")?;
        assert_eq!(cart.subtotal()?, brl(64_950));

        Ok(())
    }

    #[test]
    fn apply_coupon_replaces_previous_coupon() -> TestResult {
        let mut cart = Cart::default();
        let book = CouponBook::default();

        cart.apply_coupon("PRIMEIRA10", &book)?;
        cart.apply_coupon("CASA15", &book)?;

        assert_eq!(cart.coupon().map(Coupon::code), Some("CASA15"));

        Ok(())
    }

    #[test]
    fn apply_unknown_coupon_leaves_slot_untouched() -> TestResult {
        let mut cart = Cart::default();
        let book = CouponBook::default();

        let result = cart.apply_coupon("XYZ", &book).map(|coupon| coupon.code().to_string());

        assert_eq!(
            result,
            Err(CartError::Coupon(CouponError::Unknown("XYZ".to_string())))
        );
        assert!(cart.coupon().is_none());

        cart.apply_coupon("FRETE20", &book)?;
        assert!(cart.apply_coupon("XYZ", &book).is_err());
        assert_eq!(cart.coupon().map(Coupon::code), Some("FRETE20"));

        Ok(())
    }

    #[test]
    fn remove_coupon_empties_slot() -> TestResult {
        let mut cart = Cart::default();

        cart.apply_coupon("CASA15", &CouponBook::default())?;

        assert!(cart.remove_coupon().is_some());
        assert!(cart.coupon().is_none());

        Ok(())
    }
}
