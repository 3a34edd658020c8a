//! Nutrition facts attached to food items.

use serde::{Deserialize, Serialize};

/// Per-serving nutrition facts.
///
/// Every field is always present. Sources that omit a value deserialize it
/// as `0`, so consumers never branch on missing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    /// Energy in kilocalories.
    pub calories: u32,
    /// Protein in grams.
    pub protein: u32,
    /// Carbohydrates in grams.
    pub carbs: u32,
    /// Fat in grams.
    pub fat: u32,
}

impl Nutrition {
    /// Create nutrition facts from the four tracked values.
    #[must_use]
    pub const fn new(calories: u32, protein: u32, carbs: u32, fat: u32) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }
}
