//! Room Config

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    calculator::{CalculatorError, Surface, total_area},
    storage::{KeyValueStore, StorageError, load_json, save_json},
};

/// Storage key of the saved room.
pub const ROOM_CONFIG_KEY: &str = "roomConfig";

/// A room laid out in the visualizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomConfig {
    /// Room width in metres
    pub width_m: Decimal,

    /// Room length in metres
    pub length_m: Decimal,

    /// Ceiling height in metres
    pub height_m: Decimal,

    /// Wall colour as a hex string
    pub wall_color: String,

    /// Floor finish
    pub floor: String,

    /// Products placed in the room
    pub product_ids: Vec<String>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width_m: Decimal::new(40, 1),
            length_m: Decimal::new(50, 1),
            height_m: Decimal::new(27, 1),
            wall_color: "#f5f0e8".to_string(),
            floor: "madeira".to_string(),
            product_ids: Vec::new(),
        }
    }
}

impl RoomConfig {
    /// Total area of the four walls, in square metres.
    ///
    /// # Errors
    ///
    /// Returns a [`CalculatorError`] for non-positive or oversized dimensions.
    pub fn wall_area_m2(&self) -> Result<Decimal, CalculatorError> {
        total_area(&self.walls(), "wall")
    }

    /// The four walls, ready for a wallpaper estimate.
    pub fn walls(&self) -> Vec<Surface> {
        vec![
            Surface::new(self.width_m, self.height_m),
            Surface::new(self.length_m, self.height_m),
            Surface::new(self.width_m, self.height_m),
            Surface::new(self.length_m, self.height_m),
        ]
    }

    /// Floor area in square metres.
    ///
    /// # Errors
    ///
    /// Returns a [`CalculatorError`] for non-positive or oversized dimensions.
    pub fn floor_area_m2(&self) -> Result<Decimal, CalculatorError> {
        Surface::new(self.width_m, self.length_m).area("floor")
    }

    /// Load the saved room; missing or malformed data yields `None`.
    pub fn load(store: &impl KeyValueStore) -> Option<Self> {
        load_json(store, ROOM_CONFIG_KEY)
    }

    /// Save the room.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the room cannot be written.
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        save_json(store, ROOM_CONFIG_KEY, self)
    }
}
