//! Catalog
//!
//! In-memory product reference data with the listing filters and sort orders
//! the storefront offers.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    prices::Price,
    products::{Category, Product, ProductKey},
};

mod repository;

pub use repository::{InMemoryProductsRepository, MockProductsRepository, ProductsRepository};

/// Catalog errors.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// No product with the given id.
    #[error("product {0} not found")]
    NotFound(String),

    /// A product with the same id was already added.
    #[error("product {0} already exists")]
    AlreadyExists(String),
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Featured products first, then catalog order
    #[default]
    Relevance,

    /// Cheapest first
    PriceAsc,

    /// Most expensive first
    PriceDesc,

    /// Best rated first
    Rating,

    /// Alphabetical
    Name,

    /// Most recently added first
    Newest,
}

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Only this category
    pub category: Option<Category>,

    /// Free text over name, description and tags
    pub search: Option<String>,

    /// Inclusive lower price bound
    pub min_price: Option<Price>,

    /// Inclusive upper price bound
    pub max_price: Option<Price>,

    /// Only featured products
    pub featured_only: bool,

    /// Only products with stock
    pub in_stock_only: bool,

    /// Result order
    pub sort: SortOrder,
}

impl ProductQuery {
    /// Whether `product` passes every filter.
    pub fn matches(&self, product: &Product) -> bool {
        let price = product.price.to_minor_units();

        self.category.is_none_or(|category| product.category() == category)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| product.matches_text(needle))
            && self
                .min_price
                .is_none_or(|min| price >= min.to_minor_units())
            && self
                .max_price
                .is_none_or(|max| price <= max.to_minor_units())
            && (!self.featured_only || product.featured)
            && (!self.in_stock_only || product.in_stock())
    }
}

/// Catalog
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    keys: FxHashMap<String, ProductKey>,

    /// Insertion order, used for relevance and "newest" sorting.
    order: Vec<ProductKey>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AlreadyExists`] on duplicate ids.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AlreadyExists`] if the id is taken.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        if self.keys.contains_key(&product.id) {
            return Err(CatalogError::AlreadyExists(product.id));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.keys.insert(id, key);
        self.order.push(key);

        Ok(key)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for unknown ids.
    pub fn get(&self, id: &str) -> Result<&Product, CatalogError> {
        self.keys
            .get(id)
            .and_then(|key| self.products.get(*key))
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Get a product by key.
    pub fn by_key(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products passing `query`, in the requested order.
    pub fn search(&self, query: &ProductQuery) -> Vec<&Product> {
        let mut results: Vec<(usize, &Product)> = self
            .iter()
            .enumerate()
            .filter(|(_, product)| query.matches(product))
            .collect();

        match query.sort {
            SortOrder::Relevance => {
                results.sort_by_key(|(position, product)| (!product.featured, *position));
            }
            SortOrder::PriceAsc => {
                results.sort_by_key(|(_, product)| product.price.to_minor_units());
            }
            SortOrder::PriceDesc => {
                results.sort_by_key(|(_, product)| Reverse(product.price.to_minor_units()));
            }
            SortOrder::Rating => {
                results.sort_by(|(_, a), (_, b)| {
                    b.rating.cmp(&a.rating).then_with(|| b.reviews.cmp(&a.reviews))
                });
            }
            SortOrder::Name => {
                results.sort_by_key(|(_, product)| product.name.to_lowercase());
            }
            SortOrder::Newest => {
                results.sort_by_key(|(position, _)| Reverse(*position));
            }
        }

        debug!(matches = results.len(), sort = ?query.sort, "catalog search");

        results.into_iter().map(|(_, product)| product).collect()
    }

    /// Featured products, in catalog order.
    pub fn featured(&self) -> Vec<&Product> {
        self.iter().filter(|product| product.featured).collect()
    }

    /// Up to `limit` other products from the same category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for unknown ids.
    pub fn related(&self, id: &str, limit: usize) -> Result<Vec<&Product>, CatalogError> {
        let category = self.get(id)?.category();

        Ok(self
            .iter()
            .filter(|product| product.id != id && product.category() == category)
            .take(limit)
            .collect())
    }

    /// Products with stock at or below `threshold`, lowest stock first.
    pub fn low_stock(&self, threshold: u32) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .iter()
            .filter(|product| product.stock <= threshold)
            .collect();

        products.sort_by_key(|product| product.stock);

        products
    }
}
