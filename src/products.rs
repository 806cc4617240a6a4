//! Products

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::prices::Price;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Storefront department a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Wallpaper rolls
    #[serde(rename = "papel-de-parede")]
    Wallpaper,

    /// Curtains and blinds
    #[serde(rename = "cortinas")]
    Curtains,

    /// Decorative objects
    #[serde(rename = "decoracao")]
    Decoration,
}

impl Category {
    /// All categories, in storefront menu order.
    pub const ALL: [Category; 3] = [Self::Wallpaper, Self::Curtains, Self::Decoration];

    /// The URL slug used by the storefront.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Wallpaper => "papel-de-parede",
            Self::Curtains => "cortinas",
            Self::Decoration => "decoracao",
        }
    }

    /// Looks a category up by its slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.slug() == slug)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// How much light a curtain fabric lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Opacity {
    /// Sheer fabric
    #[serde(rename = "translucida")]
    Translucent,

    /// Dims the room without fully darkening it
    SemiBlackout,

    /// Blocks light entirely
    Blackout,
}

/// Wallpaper specific attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallpaperAttributes {
    /// Roll width in metres
    pub roll_width_m: Option<Decimal>,

    /// Roll length in metres
    pub roll_length_m: Option<Decimal>,

    /// Vertical pattern repeat in centimetres
    pub pattern_repeat_cm: Option<Decimal>,

    /// Whether the paper can be washed
    #[serde(default)]
    pub washable: bool,
}

/// Curtain specific attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurtainAttributes {
    /// Light blocking level
    pub opacity: Option<Opacity>,

    /// Finished width in metres
    pub width_m: Option<Decimal>,

    /// Finished height in metres
    pub height_m: Option<Decimal>,

    /// Fabric description
    pub fabric: Option<String>,
}

/// Decoration specific attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecorationAttributes {
    /// Free-form dimensions, e.g. "40 x 60 cm"
    pub dimensions: Option<String>,

    /// Main material
    pub material: Option<String>,
}

/// Category plus the attributes that only make sense for it.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductDetails {
    /// Wallpaper roll
    Wallpaper(WallpaperAttributes),

    /// Curtain
    Curtains(CurtainAttributes),

    /// Decorative object
    Decoration(DecorationAttributes),
}

impl ProductDetails {
    /// Empty attributes for a category.
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Wallpaper => Self::Wallpaper(WallpaperAttributes::default()),
            Category::Curtains => Self::Curtains(CurtainAttributes::default()),
            Category::Decoration => Self::Decoration(DecorationAttributes::default()),
        }
    }

    /// The category these details belong to.
    pub fn category(&self) -> Category {
        match self {
            Self::Wallpaper(_) => Category::Wallpaper,
            Self::Curtains(_) => Category::Curtains,
            Self::Decoration(_) => Category::Decoration,
        }
    }
}

/// Product
///
/// Immutable reference data; the cart keeps its own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Storefront id, used in `/produto/{id}`
    pub id: String,

    /// Product name
    pub name: String,

    /// Long description
    pub description: String,

    /// Current selling price
    pub price: Price,

    /// Price before markdown, if the product is on sale
    pub original_price: Option<Price>,

    /// Category and category specific attributes
    pub details: ProductDetails,

    /// Units available
    pub stock: u32,

    /// Average review score, 0 to 5
    pub rating: Decimal,

    /// Number of reviews
    pub reviews: u32,

    /// Highlighted on the home page
    pub featured: bool,

    /// Product tags
    pub tags: SmallVec<[String; 4]>,
}

impl Product {
    /// The product's category.
    pub fn category(&self) -> Category {
        self.details.category()
    }

    /// Whether any units are available.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Markdown from `original_price` to `price`, if any.
    pub fn discount_percent(&self) -> Option<Percentage> {
        let original = self.original_price?.to_minor_units();
        let current = self.price.to_minor_units();

        if original <= 0 || current >= original {
            return None;
        }

        let original = Decimal::from_i64(original)?;
        let current = Decimal::from_i64(current)?;

        Some(Percentage::from((original - current) / original))
    }

    /// Case-insensitive match against name, description and tags.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();

        if needle.is_empty() {
            return true;
        }

        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use smallvec::smallvec;

    use crate::prices::brl;

    use super::*;

    pub(crate) fn product(id: &str, price_minor: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {id}"),
            description: String::new(),
            price: brl(price_minor),
            original_price: None,
            details: ProductDetails::empty(Category::Decoration),
            stock: 10,
            rating: Decimal::new(45, 1),
            reviews: 12,
            featured: false,
            tags: SmallVec::new(),
        }
    }

    #[test]
    fn category_slugs_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_slug(category.slug()), Some(category));
        }

        assert_eq!(Category::from_slug("moveis"), None);
    }

    #[test]
    fn category_follows_details() {
        let mut curtain = product("1", 100);
        curtain.details = ProductDetails::Curtains(CurtainAttributes {
            opacity: Some(Opacity::Blackout),
            ..CurtainAttributes::default()
        });

        assert_eq!(curtain.category(), Category::Curtains);
    }

    #[test]
    fn discount_percent_from_original_price() {
        let mut sale = product("1", 7_500);
        sale.original_price = Some(brl(10_000));

        assert_eq!(
            sale.discount_percent(),
            Some(Percentage::from(Decimal::new(25, 2)))
        );
    }

    #[test]
    fn discount_percent_none_without_markdown() {
        let mut product = product("1", 10_000);

        assert_eq!(product.discount_percent(), None);

        product.original_price = Some(brl(9_000));

        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn matches_text_checks_tags_case_insensitively() {
        let mut product = product("1", 100);
        product.tags = smallvec!["Blackout".to_string()];

        assert!(product.matches_text("blackout"));
        assert!(product.matches_text("  "));
        assert!(!product.matches_text("linho"));
    }

    #[test]
    fn in_stock_requires_units() {
        let mut product = product("1", 100);

        assert!(product.in_stock());

        product.stock = 0;

        assert!(!product.in_stock());
    }
}
