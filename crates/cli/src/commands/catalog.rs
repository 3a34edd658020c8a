//! Restaurant and food catalog commands.
//!
//! # Usage
//!
//! ```bash
//! yummeal restaurants --location Chicago --search green
//! yummeal cuisines --location Chicago
//! yummeal menu 1 --search bowl
//! yummeal foods --vegan --category meals
//! yummeal popular
//! ```

use yummeal_core::RestaurantId;
use yummeal_storefront::filters::{FoodFilter, RestaurantFilter, RestaurantMenu, cuisines as unique_cuisines};
use yummeal_storefront::{Store, StoreConfig, catalog};

use super::{CommandError, print_food, print_restaurant};

/// Open the store and wait for the restaurant listing.
async fn loaded_store(config: &StoreConfig) -> Result<Store, CommandError> {
    let store = Store::open(config).await?;
    store.wait_for_restaurants().await;

    if let Some(error) = store.snapshot().error {
        return Err(CommandError::Restaurants(error));
    }
    Ok(store)
}

/// List restaurants, optionally filtered.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the listing fails.
pub async fn restaurants(
    config: &StoreConfig,
    search: Option<String>,
    cuisine: Option<String>,
) -> Result<(), CommandError> {
    let store = loaded_store(config).await?;
    let state = store.snapshot();

    let filter = RestaurantFilter {
        search: search.unwrap_or_default(),
        cuisine,
    };
    let matches = filter.apply(&state.restaurants);

    println!(
        "{} of {} restaurants in {}",
        matches.len(),
        state.restaurants.len(),
        state.location
    );
    for restaurant in matches {
        print_restaurant(restaurant);
    }
    Ok(())
}

/// List the cuisines at the configured location.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the listing fails.
pub async fn cuisines(config: &StoreConfig) -> Result<(), CommandError> {
    let store = loaded_store(config).await?;
    let state = store.snapshot();

    for cuisine in unique_cuisines(&state.restaurants) {
        println!("{cuisine}");
    }
    Ok(())
}

/// Show one restaurant and its dishes.
///
/// # Errors
///
/// Returns an error if the listing fails or the restaurant is unknown.
pub async fn menu(
    config: &StoreConfig,
    restaurant_id: &str,
    search: Option<&str>,
) -> Result<(), CommandError> {
    let store = loaded_store(config).await?;
    let id = RestaurantId::new(restaurant_id);
    let restaurant = store
        .find_restaurant(&id)
        .ok_or_else(|| CommandError::RestaurantNotFound(restaurant_id.to_string()))?;

    print_restaurant(&restaurant);
    println!("{}", restaurant.location);

    let menu = RestaurantMenu::for_restaurant(&id, catalog::food_items());
    if let Some(term) = search {
        println!("\nMatching \"{term}\"");
        for item in menu.search(term) {
            print_food(item);
        }
        return Ok(());
    }

    if menu.is_empty() {
        println!("\nNo dishes listed yet");
        return Ok(());
    }
    println!("\nMain dishes");
    for item in menu.mains() {
        print_food(item);
    }
    println!("\nSides");
    for item in menu.sides() {
        print_food(item);
    }
    Ok(())
}

/// List catalog items passing `filter`.
pub fn foods(filter: &FoodFilter) {
    let matches = filter.apply(catalog::food_items());
    println!("{} of {} dishes", matches.len(), catalog::food_items().len());
    for item in matches {
        print_food(item);
    }
}

/// Featured restaurants and popular dishes.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the listing fails.
pub async fn popular(config: &StoreConfig) -> Result<(), CommandError> {
    let store = loaded_store(config).await?;

    println!("Featured restaurants in {}", store.location());
    for restaurant in store.featured_restaurants() {
        print_restaurant(&restaurant);
    }

    println!("\nPopular dishes");
    for item in store.popular_items() {
        print_food(item);
    }
    Ok(())
}
