//! Material calculator
//!
//! Estimates how many wallpaper rolls cover a set of walls, and how much
//! fabric a curtain needs for a window.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

use crate::products::WallpaperAttributes;

/// Calculator errors
#[derive(Debug, Error, PartialEq)]
pub enum CalculatorError {
    /// A length, width or height is zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),

    /// A ratio is negative.
    #[error("{0} cannot be negative")]
    Negative(&'static str),

    /// No walls to cover.
    #[error("at least one wall is required")]
    NoWalls,

    /// Openings cover the whole wall area.
    #[error("openings cover the whole wall area")]
    NothingToCover,

    /// The result does not fit the output type.
    #[error("result is too large")]
    Overflow,
}

fn positive(value: Decimal, name: &'static str) -> Result<Decimal, CalculatorError> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(CalculatorError::NonPositive(name))
    }
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, CalculatorError> {
    a.checked_mul(b).ok_or(CalculatorError::Overflow)
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, CalculatorError> {
    a.checked_add(b).ok_or(CalculatorError::Overflow)
}

fn div(a: Decimal, b: Decimal) -> Result<Decimal, CalculatorError> {
    a.checked_div(b).ok_or(CalculatorError::Overflow)
}

/// Sum the areas of `surfaces`.
pub(crate) fn total_area(
    surfaces: &[Surface],
    name: &'static str,
) -> Result<Decimal, CalculatorError> {
    surfaces
        .iter()
        .try_fold(Decimal::ZERO, |total, surface| add(total, surface.area(name)?))
}

fn ceil_u32(value: Decimal) -> Result<u32, CalculatorError> {
    value.ceil().to_u32().ok_or(CalculatorError::Overflow)
}

/// A rectangular surface, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    /// Width in metres
    pub width_m: Decimal,
    /// Height in metres
    pub height_m: Decimal,
}

impl Surface {
    /// Create a surface.
    pub fn new(width_m: Decimal, height_m: Decimal) -> Self {
        Self { width_m, height_m }
    }

    pub(crate) fn area(self, name: &'static str) -> Result<Decimal, CalculatorError> {
        mul(positive(self.width_m, name)?, positive(self.height_m, name)?)
    }
}

/// Size of one wallpaper roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollSpec {
    /// Roll width in metres
    pub width_m: Decimal,
    /// Roll length in metres
    pub length_m: Decimal,
}

impl Default for RollSpec {
    fn default() -> Self {
        Self {
            width_m: Decimal::new(53, 2),
            length_m: Decimal::new(10, 0),
        }
    }
}

impl From<&WallpaperAttributes> for RollSpec {
    /// Roll size of a wallpaper product, falling back to the standard roll.
    fn from(attributes: &WallpaperAttributes) -> Self {
        let standard = Self::default();

        Self {
            width_m: attributes.roll_width_m.unwrap_or(standard.width_m),
            length_m: attributes.roll_length_m.unwrap_or(standard.length_m),
        }
    }
}

/// Wallpaper job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperJob {
    /// Walls to cover
    pub walls: Vec<Surface>,
    /// Doors and windows left bare
    pub openings: Vec<Surface>,
    /// Roll being hung
    pub roll: RollSpec,
    /// Extra fraction for trimming and pattern matching
    pub waste: Decimal,
}

impl WallpaperJob {
    /// Job with the default roll size and 10% waste.
    pub fn new(walls: Vec<Surface>) -> Self {
        Self {
            walls,
            openings: Vec::new(),
            roll: RollSpec::default(),
            waste: Decimal::new(10, 2),
        }
    }

    /// Subtract a door or window.
    #[must_use]
    pub fn with_opening(mut self, opening: Surface) -> Self {
        self.openings.push(opening);
        self
    }

    /// Use a specific roll size.
    #[must_use]
    pub fn with_roll(mut self, roll: RollSpec) -> Self {
        self.roll = roll;
        self
    }

    /// Estimate the rolls needed.
    ///
    /// # Errors
    ///
    /// Returns a [`CalculatorError`] for missing walls, non-positive dimensions,
    /// negative waste, openings that cover every wall, or sizes too large to
    /// compute.
    pub fn estimate(&self) -> Result<WallpaperEstimate, CalculatorError> {
        if self.walls.is_empty() {
            return Err(CalculatorError::NoWalls);
        }

        if self.waste < Decimal::ZERO {
            return Err(CalculatorError::Negative("waste"));
        }

        let wall_area = total_area(&self.walls, "wall")?;
        let openings_area = total_area(&self.openings, "opening")?;

        let area = wall_area
            .checked_sub(openings_area)
            .ok_or(CalculatorError::Overflow)?;

        if area <= Decimal::ZERO {
            return Err(CalculatorError::NothingToCover);
        }

        let roll_area = mul(
            positive(self.roll.width_m, "roll width")?,
            positive(self.roll.length_m, "roll length")?,
        )?;

        let area_with_waste = mul(area, add(Decimal::ONE, self.waste)?)?;

        Ok(WallpaperEstimate {
            area_m2: area,
            area_with_waste_m2: area_with_waste,
            rolls: ceil_u32(div(area_with_waste, roll_area)?)?,
        })
    }
}

/// Result of a wallpaper estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallpaperEstimate {
    /// Area to cover
    pub area_m2: Decimal,
    /// Area including waste
    pub area_with_waste_m2: Decimal,
    /// Whole rolls to buy
    pub rolls: u32,
}

/// Curtain job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurtainJob {
    /// Window to dress
    pub window: Surface,
    /// Fabric width per metre of window
    pub fullness: Decimal,
    /// Width of one fabric bolt
    pub bolt_width_m: Decimal,
    /// Extra height for hems and header
    pub hem_allowance_m: Decimal,
}

impl CurtainJob {
    /// Job with 2× fullness, 2.80 m bolts and a 20 cm hem allowance.
    pub fn new(window: Surface) -> Self {
        Self {
            window,
            fullness: Decimal::TWO,
            bolt_width_m: Decimal::new(280, 2),
            hem_allowance_m: Decimal::new(20, 2),
        }
    }

    /// Estimate the fabric needed.
    ///
    /// # Errors
    ///
    /// Returns a [`CalculatorError`] for non-positive dimensions, a negative
    /// allowance, or sizes too large to compute.
    pub fn estimate(&self) -> Result<CurtainEstimate, CalculatorError> {
        let width = positive(self.window.width_m, "window width")?;
        let height = positive(self.window.height_m, "window height")?;
        let fullness = positive(self.fullness, "fullness")?;
        let bolt_width = positive(self.bolt_width_m, "bolt width")?;

        if self.hem_allowance_m < Decimal::ZERO {
            return Err(CalculatorError::Negative("hem allowance"));
        }

        let fabric_width = mul(width, fullness)?;
        let panels = ceil_u32(div(fabric_width, bolt_width)?)?;
        let cut_length = add(height, self.hem_allowance_m)?;

        Ok(CurtainEstimate {
            fabric_width_m: fabric_width,
            panels,
            cut_length_m: cut_length,
            total_fabric_m: mul(cut_length, Decimal::from(panels))?,
        })
    }
}

/// Result of a curtain estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurtainEstimate {
    /// Gathered fabric width
    pub fabric_width_m: Decimal,
    /// Bolt widths to sew together
    pub panels: u32,
    /// Length of each cut
    pub cut_length_m: Decimal,
    /// Fabric to buy, in running metres
    pub total_fabric_m: Decimal,
}
