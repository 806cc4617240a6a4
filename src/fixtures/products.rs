//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{BRL, Currency, EUR, USD},
};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    fixtures::FixtureError,
    prices::Price,
    products::{
        Category, CurtainAttributes, DecorationAttributes, Product, ProductDetails,
        WallpaperAttributes,
    },
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products, in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Storefront id
    pub id: String,

    /// Product name
    pub name: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Category slug
    pub category: Category,

    /// Product price (e.g., "129.90 BRL")
    pub price: String,

    /// Price before markdown
    #[serde(default)]
    pub original_price: Option<String>,

    /// Units available
    #[serde(default)]
    pub stock: u32,

    /// Average review score
    #[serde(default)]
    pub rating: Decimal,

    /// Number of reviews
    #[serde(default)]
    pub reviews: u32,

    /// Highlighted on the home page
    #[serde(default)]
    pub featured: bool,

    /// Product tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Wallpaper attributes
    #[serde(default)]
    pub wallpaper: Option<WallpaperAttributes>,

    /// Curtain attributes
    #[serde(default)]
    pub curtain: Option<CurtainAttributes>,

    /// Decoration attributes
    #[serde(default)]
    pub decoration: Option<DecorationAttributes>,
}

impl ProductFixture {
    fn details(&mut self) -> Result<ProductDetails, FixtureError> {
        let mismatch = |attributes| FixtureError::MismatchedAttributes {
            id: self.id.clone(),
            category: self.category.to_string(),
            attributes,
        };

        match self.category {
            Category::Wallpaper if self.curtain.is_some() => Err(mismatch("curtain")),
            Category::Wallpaper if self.decoration.is_some() => Err(mismatch("decoration")),
            Category::Curtains if self.wallpaper.is_some() => Err(mismatch("wallpaper")),
            Category::Curtains if self.decoration.is_some() => Err(mismatch("decoration")),
            Category::Decoration if self.wallpaper.is_some() => Err(mismatch("wallpaper")),
            Category::Decoration if self.curtain.is_some() => Err(mismatch("curtain")),
            Category::Wallpaper => Ok(ProductDetails::Wallpaper(
                self.wallpaper.take().unwrap_or_default(),
            )),
            Category::Curtains => Ok(ProductDetails::Curtains(
                self.curtain.take().unwrap_or_default(),
            )),
            Category::Decoration => Ok(ProductDetails::Decoration(
                self.decoration.take().unwrap_or_default(),
            )),
        }
    }
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(mut fixture: ProductFixture) -> Result<Self, Self::Error> {
        let details = fixture.details()?;
        let price = price_from_str(&fixture.price)?;

        let original_price = fixture
            .original_price
            .as_deref()
            .map(price_from_str)
            .transpose()?;

        if let Some(original) = original_price
            && original.currency() != price.currency()
        {
            return Err(FixtureError::CurrencyMismatch(
                price.currency().iso_alpha_code.to_string(),
                original.currency().iso_alpha_code.to_string(),
            ));
        }

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            description: fixture.description,
            price,
            original_price,
            details,
            stock: fixture.stock,
            rating: fixture.rating,
            reviews: fixture.reviews,
            featured: fixture.featured,
            tags: SmallVec::from_vec(fixture.tags),
        })
    }
}

/// Parse a products fixture, checking that every price uses the same currency
///
/// # Errors
///
/// Returns an error if the YAML is invalid, a product is malformed, or currencies differ.
pub fn products_from_yaml(yaml: &str) -> Result<Vec<Product>, FixtureError> {
    let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

    let mut currency: Option<&'static Currency> = None;
    let mut products = Vec::with_capacity(fixture.products.len());

    for product_fixture in fixture.products {
        let product = Product::try_from(product_fixture)?;
        let product_currency = product.price.currency();

        match currency {
            Some(existing) if existing != product_currency => {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }
            Some(_) => {}
            None => currency = Some(product_currency),
        }

        products.push(product);
    }

    Ok(products)
}

fn price_from_str(s: &str) -> Result<Price, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "129.90 BRL") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "BRL" => BRL,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a decimal.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(points) => (points.trim(), Decimal::ONE_HUNDRED),
        None => (trimmed, Decimal::ONE),
    };

    let value = number
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(value / scale))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::Opacity;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("129.90BRL");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_brl_and_usd() -> Result<(), FixtureError> {
        let (brl_minor, brl) = parse_price("129.90 BRL")?;
        let (usd_minor, usd) = parse_price("1.00 USD")?;

        assert_eq!(brl_minor, 12_990);
        assert_eq!(brl, BRL);
        assert_eq!(usd_minor, 100);
        assert_eq!(usd, USD);

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> Result<(), FixtureError> {
        let expected = Percentage::from(Decimal::new(15, 2));

        assert_eq!(parse_percentage("15%")?, expected);
        assert_eq!(parse_percentage("0.15")?, expected);
        assert_eq!(parse_percentage("  15 %  ")?, expected);

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_invalid_format() {
        let result = parse_percentage("invalid");

        assert!(matches!(result, Err(FixtureError::InvalidPercentage(_))));
    }

    #[test]
    fn curtain_fixture_becomes_curtain_product() -> TestResult {
        let products = products_from_yaml(
            r"
products:
  - id: cortina-linho
    name: Cortina de Linho
    category: cortinas
    price: 249.90 BRL
    original_price: 299.90 BRL
    stock: 8
    rating: 4.6
    tags: [linho, sala]
    curtain:
      opacity: semi-blackout
      width_m: 2.8
      height_m: 2.5
      fabric: Linho
",
        )?;

        let product = products.first().ok_or("no product")?;

        assert_eq!(product.category(), Category::Curtains);
        assert_eq!(product.original_price.map(|price| price.to_minor_units()), Some(29_990));
        assert_eq!(product.tags.len(), 2);

        let ProductDetails::Curtains(curtain) = &product.details else {
            return Err("expected curtain details".into());
        };

        assert_eq!(curtain.opacity, Some(Opacity::SemiBlackout));

        Ok(())
    }

    #[test]
    fn mismatched_attributes_are_rejected() {
        let result = products_from_yaml(
            r"
products:
  - id: vaso
    name: Vaso
    category: decoracao
    price: 49.90 BRL
    wallpaper:
      washable: true
",
        );

        assert!(matches!(
            result,
            Err(FixtureError::MismatchedAttributes { attributes: "wallpaper", .. })
        ));
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let result = products_from_yaml(
            r"
products:
  - id: a
    name: A
    category: decoracao
    price: 10.00 BRL
  - id: b
    name: B
    category: decoracao
    price: 10.00 USD
",
        );

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));
    }
}
