//! Derived catalog views: nutrition filters, restaurant search and menus.
//!
//! All views borrow from the lists they filter and never mutate them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use yummeal_core::RestaurantId;

use crate::models::{FoodItem, Restaurant};

/// Upper bound of the calorie range slider.
pub const MAX_CALORIES: u32 = 800;
/// "Low calorie" means at most this many calories.
pub const LOW_CALORIE_MAX: u32 = 300;
/// "High protein" means at least this many grams of protein.
pub const HIGH_PROTEIN_MIN: u32 = 20;
/// "Low carb" means at most this many grams of carbohydrates.
pub const LOW_CARB_MAX: u32 = 30;
/// Dishes above this many calories are mains; the rest are sides.
pub const MAIN_DISH_MIN_CALORIES: u32 = 300;

/// Catalog items known to be vegan.
const VEGAN_ITEM_IDS: &[&str] = &["2", "4", "8"];

/// Restaurants with a numeric ID up to this value serve meals, above it salads.
const MEAL_RESTAURANT_MAX_ID: u64 = 3;

// =============================================================================
// Food filter
// =============================================================================

/// Menu category tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    #[default]
    All,
    Meals,
    Salads,
}

impl MenuCategory {
    /// Whether a dish from `restaurant_id` belongs in this category.
    ///
    /// Categories are derived from numeric restaurant IDs; a non-numeric ID
    /// cannot be classified and is shown in every category.
    #[must_use]
    pub fn includes(self, restaurant_id: &RestaurantId) -> bool {
        match (self, restaurant_id.as_number()) {
            (Self::All, _) | (_, None) => true,
            (Self::Meals, Some(id)) => id <= MEAL_RESTAURANT_MAX_ID,
            (Self::Salads, Some(id)) => id > MEAL_RESTAURANT_MAX_ID,
        }
    }
}

impl std::str::FromStr for MenuCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "meals" => Ok(Self::Meals),
            "salads" => Ok(Self::Salads),
            _ => Err(format!("invalid menu category: {s} (expected all, meals or salads)")),
        }
    }
}

/// Nutrition-oriented filter over food items.
///
/// Every criterion must hold for an item to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodFilter {
    /// Case-insensitive text matched against name or description.
    pub search: String,
    /// Inclusive lower calorie bound.
    pub min_calories: u32,
    /// Inclusive upper calorie bound.
    pub max_calories: u32,
    /// At most [`LOW_CALORIE_MAX`] calories.
    pub low_calorie: bool,
    /// At least [`HIGH_PROTEIN_MIN`] grams of protein.
    pub high_protein: bool,
    /// At most [`LOW_CARB_MAX`] grams of carbohydrates.
    pub low_carb: bool,
    /// Only vegan dishes.
    pub vegan: bool,
    pub category: MenuCategory,
}

impl Default for FoodFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            min_calories: 0,
            max_calories: MAX_CALORIES,
            low_calorie: false,
            high_protein: false,
            low_carb: false,
            vegan: false,
            category: MenuCategory::All,
        }
    }
}

impl FoodFilter {
    /// Whether `item` passes every active criterion.
    #[must_use]
    pub fn matches(&self, item: &FoodItem) -> bool {
        let facts = &item.nutrition;

        item.matches_text(&self.search)
            && (self.min_calories..=self.max_calories).contains(&facts.calories)
            && !(self.low_calorie && facts.calories > LOW_CALORIE_MAX)
            && !(self.high_protein && facts.protein < HIGH_PROTEIN_MIN)
            && !(self.low_carb && facts.carbs > LOW_CARB_MAX)
            && !(self.vegan && !VEGAN_ITEM_IDS.contains(&item.id.as_str()))
            && self.category.includes(&item.restaurant_id)
    }

    /// Items passing the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [FoodItem]) -> Vec<&'a FoodItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    /// Restore every criterion to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// Restaurant filter
// =============================================================================

/// Search over the current restaurant list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantFilter {
    /// Case-insensitive text matched against name or cuisine.
    pub search: String,
    /// Exact cuisine to keep; `None` keeps all cuisines.
    pub cuisine: Option<String>,
}

impl RestaurantFilter {
    #[must_use]
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = restaurant.name.to_lowercase().contains(&term)
            || restaurant.cuisine.to_lowercase().contains(&term);
        let matches_cuisine = self
            .cuisine
            .as_deref()
            .is_none_or(|cuisine| restaurant.cuisine == cuisine);

        matches_search && matches_cuisine
    }

    /// Restaurants passing the filter, in list order.
    #[must_use]
    pub fn apply<'a>(&self, restaurants: &'a [Restaurant]) -> Vec<&'a Restaurant> {
        restaurants.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Distinct cuisines in first-seen order.
#[must_use]
pub fn cuisines(restaurants: &[Restaurant]) -> Vec<&str> {
    let mut seen = HashSet::new();
    restaurants
        .iter()
        .map(|r| r.cuisine.as_str())
        .filter(|cuisine| seen.insert(*cuisine))
        .collect()
}

// =============================================================================
// Restaurant menu
// =============================================================================

/// The dishes one restaurant serves, split into mains and sides.
#[derive(Debug, Clone)]
pub struct RestaurantMenu<'a> {
    items: Vec<&'a FoodItem>,
}

impl<'a> RestaurantMenu<'a> {
    /// Collect the dishes of `restaurant_id` from `items`.
    #[must_use]
    pub fn for_restaurant(restaurant_id: &RestaurantId, items: &'a [FoodItem]) -> Self {
        Self {
            items: items
                .iter()
                .filter(|item| &item.restaurant_id == restaurant_id)
                .collect(),
        }
    }

    /// Every dish, in catalog order.
    #[must_use]
    pub fn items(&self) -> &[&'a FoodItem] {
        &self.items
    }

    /// Dishes above [`MAIN_DISH_MIN_CALORIES`].
    #[must_use]
    pub fn mains(&self) -> Vec<&'a FoodItem> {
        self.items
            .iter()
            .copied()
            .filter(|item| item.nutrition.calories > MAIN_DISH_MIN_CALORIES)
            .collect()
    }

    /// Dishes at or below [`MAIN_DISH_MIN_CALORIES`].
    #[must_use]
    pub fn sides(&self) -> Vec<&'a FoodItem> {
        self.items
            .iter()
            .copied()
            .filter(|item| item.nutrition.calories <= MAIN_DISH_MIN_CALORIES)
            .collect()
    }

    /// Dishes whose name or description contains `term`.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&'a FoodItem> {
        self.items
            .iter()
            .copied()
            .filter(|item| item.matches_text(term))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::food_items;

    fn ids(items: &[&FoodItem]) -> Vec<String> {
        items.iter().map(|i| i.id.to_string()).collect()
    }

    fn restaurant(id: &str, name: &str, cuisine: &str) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            name: name.to_string(),
            image: String::new(),
            rating: 4.5,
            delivery_time: "20-30 min".to_string(),
            delivery_fee: "$0.99".to_string(),
            cuisine: cuisine.to_string(),
            location: "Chicago".to_string(),
        }
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        assert_eq!(FoodFilter::default().apply(food_items()).len(), food_items().len());
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let filter = FoodFilter {
            search: "TAHINI".to_string(),
            ..FoodFilter::default()
        };
        assert_eq!(ids(&filter.apply(food_items())), ["1", "8"]);
    }

    #[test]
    fn test_calorie_range_is_inclusive() {
        let filter = FoodFilter {
            min_calories: 280,
            max_calories: 350,
            ..FoodFilter::default()
        };
        assert_eq!(ids(&filter.apply(food_items())), ["1", "2", "5"]);
    }

    #[test]
    fn test_nutrition_flags() {
        let low_calorie = FoodFilter {
            low_calorie: true,
            ..FoodFilter::default()
        };
        assert_eq!(ids(&low_calorie.apply(food_items())), ["2", "4", "7"]);

        let high_protein = FoodFilter {
            high_protein: true,
            ..FoodFilter::default()
        };
        assert_eq!(ids(&high_protein.apply(food_items())), ["3", "5", "7"]);

        let low_carb = FoodFilter {
            low_carb: true,
            ..FoodFilter::default()
        };
        assert_eq!(ids(&low_carb.apply(food_items())), ["2", "4", "5", "7"]);

        let vegan = FoodFilter {
            vegan: true,
            ..FoodFilter::default()
        };
        assert_eq!(ids(&vegan.apply(food_items())), ["2", "4", "8"]);
    }

    #[test]
    fn test_flags_combine() {
        let filter = FoodFilter {
            low_carb: true,
            high_protein: true,
            ..FoodFilter::default()
        };
        assert_eq!(ids(&filter.apply(food_items())), ["5", "7"]);
    }

    #[test]
    fn test_categories_split_by_restaurant() {
        let meals = FoodFilter {
            category: MenuCategory::Meals,
            ..FoodFilter::default()
        };
        assert_eq!(ids(&meals.apply(food_items())), ["1", "2", "3", "7", "8"]);

        let salads = FoodFilter {
            category: MenuCategory::Salads,
            ..FoodFilter::default()
        };
        assert_eq!(ids(&salads.apply(food_items())), ["4", "5", "6"]);
    }

    #[test]
    fn test_non_numeric_restaurant_is_in_every_category() {
        let id = RestaurantId::new("65f1c0ffee");
        assert!(MenuCategory::Meals.includes(&id));
        assert!(MenuCategory::Salads.includes(&id));
    }

    #[test]
    fn test_reset() {
        let mut filter = FoodFilter {
            search: "bowl".to_string(),
            vegan: true,
            max_calories: 100,
            category: MenuCategory::Salads,
            ..FoodFilter::default()
        };
        filter.reset();
        assert_eq!(filter, FoodFilter::default());
    }

    #[test]
    fn test_menu_category_from_str() {
        assert_eq!("meals".parse::<MenuCategory>().unwrap(), MenuCategory::Meals);
        assert!("desserts".parse::<MenuCategory>().is_err());
    }

    #[test]
    fn test_restaurant_filter() {
        let restaurants = vec![
            restaurant("1", "Healthy Bites", "Healthy"),
            restaurant("2", "Green Garden", "Vegan"),
            restaurant("3", "Protein Palace", "High Protein"),
        ];

        let by_text = RestaurantFilter {
            search: "vegan".to_string(),
            cuisine: None,
        };
        assert_eq!(by_text.apply(&restaurants).len(), 1);

        let by_name = RestaurantFilter {
            search: "PALACE".to_string(),
            cuisine: None,
        };
        assert_eq!(by_name.apply(&restaurants)[0].id.as_str(), "3");

        let by_cuisine = RestaurantFilter {
            search: String::new(),
            cuisine: Some("Healthy".to_string()),
        };
        assert_eq!(by_cuisine.apply(&restaurants)[0].id.as_str(), "1");
        assert_eq!(by_cuisine.apply(&restaurants).len(), 1);
    }

    #[test]
    fn test_cuisines_are_unique_in_first_seen_order() {
        let restaurants = vec![
            restaurant("1", "A", "Vegan"),
            restaurant("2", "B", "Healthy"),
            restaurant("3", "C", "Vegan"),
        ];
        assert_eq!(cuisines(&restaurants), ["Vegan", "Healthy"]);
    }

    #[test]
    fn test_restaurant_menu() {
        let menu = RestaurantMenu::for_restaurant(&RestaurantId::new("1"), food_items());
        assert_eq!(ids(menu.items()), ["1", "7"]);
        assert_eq!(ids(&menu.mains()), ["1"]);
        assert_eq!(ids(&menu.sides()), ["7"]);
        assert_eq!(ids(&menu.search("berries")), ["7"]);

        let empty = RestaurantMenu::for_restaurant(&RestaurantId::new("42"), food_items());
        assert!(empty.is_empty());
    }
}
