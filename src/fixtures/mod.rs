//! Fixtures
//!
//! Catalog and coupon reference data loaded from YAML files laid out as
//! `<base>/products/<set>.yml` and `<base>/coupons/<set>.yml`.

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    coupons::{CouponBook, CouponError},
    products::Product,
};

pub mod coupons;
pub mod products;

pub use products::{parse_percentage, parse_price};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Attributes given for a different category
    #[error("Product {id} is listed as {category} but has {attributes} attributes")]
    MismatchedAttributes {
        /// Product id
        id: String,
        /// Declared category
        category: String,
        /// Attribute block found
        attributes: &'static str,
    },

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Catalog rejected a product
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Coupon book rejected a coupon
    #[error(transparent)]
    Coupon(#[from] CouponError),
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new fixture reader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new fixture reader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn read(&self, kind: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));

        Ok(fs::read_to_string(file_path)?)
    }

    /// Load products from a YAML fixture file, in file order
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if products use different currencies.
    pub fn load_products(&self, name: &str) -> Result<Vec<Product>, FixtureError> {
        products::products_from_yaml(&self.read("products", name)?)
    }

    /// Load a catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the products cannot be loaded or an id is repeated.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog, FixtureError> {
        Ok(Catalog::with_products(self.load_products(name)?)?)
    }

    /// Load a coupon book from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a discount is out of range.
    pub fn load_coupons(&self, name: &str) -> Result<CouponBook, FixtureError> {
        coupons::coupons_from_yaml(&self.read("coupons", name)?)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let fixture = Fixture::with_base_path("/nonexistent");

        assert!(matches!(
            fixture.load_products("decora"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn loads_files_from_base_path() -> TestResult {
        let dir = tempfile::tempdir()?;

        fs::create_dir_all(dir.path().join("products"))?;
        fs::create_dir_all(dir.path().join("coupons"))?;

        fs::write(
            dir.path().join("products").join("mini.yml"),
            "products:\n  - id: vaso\n    name: Vaso\n    category: decoracao\n    price: 49.90 BRL\n",
        )?;
        fs::write(
            dir.path().join("coupons").join("mini.yml"),
            "coupons:\n  BEMVINDO: 5%\n",
        )?;

        let fixture = Fixture::with_base_path(dir.path());

        let catalog = fixture.load_catalog("mini")?;
        let coupons = fixture.load_coupons("mini")?;

        assert_eq!(catalog.get("vaso")?.name, "Vaso");
        assert!(coupons.resolve("BEMVINDO").is_some());

        Ok(())
    }
}
