//! Bundled food catalog.
//!
//! Food items are not served by the catalog API yet, so the storefront ships
//! a fixed menu. Restaurant IDs refer to the numbered demo restaurants.

use std::sync::LazyLock;

use yummeal_core::{FoodItemId, Nutrition, Price, RestaurantId};

use crate::models::FoodItem;

/// Number of items shown as "popular".
pub const POPULAR_ITEM_COUNT: usize = 4;

static FOOD_ITEMS: LazyLock<Vec<FoodItem>> = LazyLock::new(|| {
    vec![
        item(
            "1",
            "Quinoa Bowl",
            "Fresh quinoa with roasted vegetables and tahini dressing",
            "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=800&auto=format&fit=crop",
            1199,
            Nutrition::new(320, 12, 45, 8),
            "1",
        ),
        item(
            "2",
            "Avocado Toast",
            "Whole grain toast with smashed avocado, cherry tomatoes, and microgreens",
            "https://images.unsplash.com/photo-1592417817098-8fd3d9eb14a5?w=800&auto=format&fit=crop",
            999,
            Nutrition::new(280, 8, 30, 12),
            "2",
        ),
        item(
            "3",
            "Chicken Protein Bowl",
            "Grilled chicken breast with sweet potatoes, broccoli, and brown rice",
            "https://images.unsplash.com/photo-1559847844-5315695dadae?w=800&auto=format&fit=crop",
            1399,
            Nutrition::new(420, 35, 40, 10),
            "3",
        ),
        item(
            "4",
            "Super Green Salad",
            "Kale, spinach, cucumber, avocado with lemon vinaigrette",
            "https://images.unsplash.com/photo-1540420773420-3366772f4999?w=800&auto=format&fit=crop",
            1099,
            Nutrition::new(210, 5, 15, 14),
            "4",
        ),
        item(
            "5",
            "Low-Cal Salmon Plate",
            "Grilled salmon with asparagus and cauliflower rice",
            "https://images.unsplash.com/photo-1467003909585-2f8a72700288?w=800&auto=format&fit=crop",
            1599,
            Nutrition::new(350, 28, 18, 16),
            "5",
        ),
        item(
            "6",
            "Macro-Balanced Stir Fry",
            "Tofu stir fry with brown rice and mixed vegetables",
            "https://images.unsplash.com/photo-1512058564366-18510be2db19?w=800&auto=format&fit=crop",
            1299,
            Nutrition::new(380, 18, 50, 9),
            "6",
        ),
        item(
            "7",
            "Berry Protein Smoothie",
            "Mixed berries, Greek yogurt, protein powder, and almond milk",
            "https://images.unsplash.com/photo-1553530666-ba11a2d539c7?w=800&auto=format&fit=crop",
            799,
            Nutrition::new(240, 20, 25, 5),
            "1",
        ),
        item(
            "8",
            "Vegan Buddha Bowl",
            "Chickpeas, sweet potato, kale, beets, and tahini sauce",
            "https://images.unsplash.com/photo-1590301157890-4810ed352733?w=800&auto=format&fit=crop",
            1299,
            Nutrition::new(380, 15, 55, 10),
            "2",
        ),
    ]
});

fn item(
    id: &str,
    name: &str,
    description: &str,
    image: &str,
    price_cents: i64,
    nutrition: Nutrition,
    restaurant_id: &str,
) -> FoodItem {
    FoodItem {
        id: FoodItemId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        image: image.to_owned(),
        price: Price::from_cents(price_cents),
        nutrition,
        restaurant_id: RestaurantId::new(restaurant_id),
    }
}

/// Every food item, in catalog order.
#[must_use]
pub fn food_items() -> &'static [FoodItem] {
    &FOOD_ITEMS
}

/// Look up a food item by ID.
#[must_use]
pub fn find_food_item(id: &FoodItemId) -> Option<&'static FoodItem> {
    FOOD_ITEMS.iter().find(|item| &item.id == id)
}

/// The first few catalog items, highlighted on the home screen.
#[must_use]
pub fn popular_items() -> &'static [FoodItem] {
    let items = food_items();
    items.get(..POPULAR_ITEM_COUNT).unwrap_or(items)
}
