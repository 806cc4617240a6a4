//! Cart items

use crate::{
    prices::{Price, PriceError, times},
    products::Product,
};

/// A product in the cart and how many units of it.
#[derive(Clone, Debug, PartialEq)]
pub struct CartItem {
    product: Product,
    quantity: u32,
}

impl CartItem {
    pub(crate) fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product snapshot taken when it was added.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Units in the cart, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Unit price.
    pub fn unit_price(&self) -> &Price {
        &self.product.price
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the line does not fit in minor units.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        times(&self.product.price, self.quantity)
    }
}
