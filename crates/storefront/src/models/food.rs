//! Food items offered by restaurants.

use serde::{Deserialize, Serialize};

use yummeal_core::{FoodItemId, Nutrition, Price, RestaurantId};

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: FoodItemId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Price,
    /// Nutrition facts, flattened on the wire (`calories`, `protein`, ...).
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub restaurant_id: RestaurantId,
}

impl FoodItem {
    /// Case-insensitive match against name or description.
    ///
    /// An empty term matches everything.
    #[must_use]
    pub fn matches_text(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}
