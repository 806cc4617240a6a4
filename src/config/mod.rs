//! Settings
//!
//! Store rules read from a YAML file. Every field has a default, so an empty
//! file (or no file at all) yields the standard storefront rules.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{checkout::CheckoutConfig, pricing::PricingConfig};

mod logging;

pub use logging::{LogFormat, LoggingConfig};

/// Settings loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading the settings file
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse settings: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A setting is outside its allowed range (setting, allowed range)
    #[error("invalid setting {0}: must be {1}")]
    Invalid(&'static str, &'static str),
}

/// Inventory rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Products with this many units or fewer are reported as low stock
    pub low_stock_threshold: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
        }
    }
}

/// Storefront settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shipping, services and payment discounts
    pub pricing: PricingConfig,

    /// Checkout behaviour
    pub checkout: CheckoutConfig,

    /// Inventory rules
    pub inventory: InventoryConfig,
}

impl Settings {
    /// Parse settings from YAML text.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::Yaml`]: the text is not valid settings YAML.
    /// - [`SettingsError::Invalid`]: a value is out of range.
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Self = serde_norway::from_str(yaml)?;

        settings.validate()?;

        Ok(settings)
    }

    /// Check that amounts and rates are in range.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let pricing = &self.pricing;

        for (name, amount) in [
            ("pricing.free_shipping_threshold", pricing.free_shipping_threshold),
            ("pricing.shipping_fee", pricing.shipping_fee),
            ("pricing.installation_fee", pricing.installation_fee),
            ("pricing.measurement_fee", pricing.measurement_fee),
        ] {
            if amount < Decimal::ZERO {
                return Err(SettingsError::Invalid(name, "zero or more"));
            }
        }

        if pricing.pix_discount < Decimal::ZERO || pricing.pix_discount >= Decimal::ONE {
            return Err(SettingsError::Invalid(
                "pricing.pix_discount",
                "at least 0 and below 1",
            ));
        }

        if pricing.max_installments == 0 {
            return Err(SettingsError::Invalid("pricing.max_installments", "at least 1"));
        }

        let delivery = self.checkout.delivery;

        if delivery.min_days > delivery.max_days {
            return Err(SettingsError::Invalid(
                "checkout.delivery.min_days",
                "at most checkout.delivery.max_days",
            ));
        }

        Ok(())
    }

    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }
}
