//! Integration tests for restaurant loading and location changes.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use yummeal_integration_tests::{FakeCatalogApi, restaurant};
use yummeal_storefront::config::DEFAULT_LOCATION;
use yummeal_storefront::filters::{RestaurantFilter, cuisines};
use yummeal_storefront::models::Restaurant;
use yummeal_storefront::store::RESTAURANTS_ERROR;
use yummeal_storefront::{MemoryTokenStore, Store};

fn chicago() -> Vec<Value> {
    vec![
        restaurant("c1", "Green Garden", "Vegan", "Chicago"),
        restaurant("c2", "Protein Palace", "High Protein", "Chicago"),
        restaurant("c3", "Healthy Bites", "Healthy", "Chicago"),
        restaurant("c4", "Leaf & Ladle", "Vegan", "Chicago"),
        restaurant("c5", "Macro Kitchen", "Healthy", "Chicago"),
        restaurant("c6", "Bowl Theory", "Bowls", "Chicago"),
    ]
}

fn parsed(data: &[Value]) -> Vec<Restaurant> {
    serde_json::from_value(Value::Array(data.to_vec())).unwrap()
}

fn new_store(api: &FakeCatalogApi) -> Store {
    api.store(Arc::new(MemoryTokenStore::new()))
}

#[tokio::test]
async fn test_bootstrap_loads_default_location() {
    let api = FakeCatalogApi::start().await.unwrap();
    let data = vec![restaurant("v1", "Andhra Greens", "Healthy", DEFAULT_LOCATION)];
    api.set_restaurants(DEFAULT_LOCATION, data.clone());
    let store = new_store(&api);

    store.bootstrap().await;
    store.wait_for_restaurants().await;

    assert_eq!(api.restaurant_requests(), [DEFAULT_LOCATION]);
    assert_eq!(store.restaurants(), parsed(&data));
    assert!(store.snapshot().error.is_none());
}

#[tokio::test]
async fn test_update_location_replaces_list_verbatim() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.set_restaurants("Chicago", chicago());
    api.delay_location("Chicago", Duration::from_millis(100));
    let store = new_store(&api);

    store.update_location("Chicago");

    let state = store.snapshot();
    assert!(state.loading_restaurants);
    assert_eq!(state.location, "Chicago");

    store.wait_for_restaurants().await;

    let state = store.snapshot();
    assert!(!state.loading_restaurants);
    assert!(state.error.is_none());
    assert_eq!(state.restaurants, parsed(&chicago()));
}

#[tokio::test]
async fn test_subscribers_see_loading_transition() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.set_restaurants("Chicago", chicago());
    let store = new_store(&api);
    let mut receiver = store.subscribe();

    store.update_location("Chicago");
    assert!(receiver.borrow_and_update().loading_restaurants);

    receiver.changed().await.unwrap();
    let state = receiver.borrow_and_update().clone();
    assert!(!state.loading_restaurants);
    assert_eq!(state.restaurants.len(), 6);
}

#[tokio::test]
async fn test_server_error_empties_list_and_sets_error() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.set_restaurants("Chicago", chicago());
    api.fail_location("Boston");
    let store = new_store(&api);

    store.update_location("Chicago");
    store.wait_for_restaurants().await;
    assert_eq!(store.restaurants().len(), 6);

    store.update_location("Boston");
    store.wait_for_restaurants().await;

    let state = store.snapshot();
    assert!(state.restaurants.is_empty());
    assert!(!state.loading_restaurants);
    assert_eq!(state.error.as_deref(), Some(RESTAURANTS_ERROR));
}

#[tokio::test]
async fn test_unsuccessful_listing_is_a_failure() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.reject_location("Atlantis", "Location not served");
    let store = new_store(&api);

    store.update_location("Atlantis");
    store.wait_for_restaurants().await;

    let state = store.snapshot();
    assert!(state.restaurants.is_empty());
    assert_eq!(state.error.as_deref(), Some(RESTAURANTS_ERROR));
}

#[tokio::test]
async fn test_non_json_listing_is_a_failure() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.set_restaurants("Chicago", chicago());
    api.garble_location("Gotham");
    let store = new_store(&api);

    store.update_location("Chicago");
    store.wait_for_restaurants().await;
    store.update_location("Gotham");
    store.wait_for_restaurants().await;

    let state = store.snapshot();
    assert!(state.restaurants.is_empty());
    assert!(!state.loading_restaurants);
    assert_eq!(state.error.as_deref(), Some(RESTAURANTS_ERROR));
}

#[tokio::test]
async fn test_successful_fetch_clears_previous_error() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.fail_location("Boston");
    api.set_restaurants("Chicago", chicago());
    let store = new_store(&api);

    store.update_location("Boston");
    store.wait_for_restaurants().await;
    assert!(store.snapshot().error.is_some());

    store.update_location("Chicago");
    assert!(store.snapshot().error.is_none());
    store.wait_for_restaurants().await;

    let state = store.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.restaurants.len(), 6);
}

#[tokio::test]
async fn test_superseded_fetch_never_overwrites_newer_location() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.set_restaurants("Slowtown", vec![restaurant("s1", "Sleepy Salads", "Healthy", "Slowtown")]);
    api.delay_location("Slowtown", Duration::from_millis(300));
    api.set_restaurants("Chicago", chicago());
    let store = new_store(&api);

    store.update_location("Slowtown");
    tokio::time::sleep(Duration::from_millis(50)).await;
    store.update_location("Chicago");
    store.wait_for_restaurants().await;

    assert_eq!(store.restaurants(), parsed(&chicago()));

    // Well past the slow response
    tokio::time::sleep(Duration::from_millis(500)).await;

    let state = store.snapshot();
    assert_eq!(state.location, "Chicago");
    assert_eq!(state.restaurants, parsed(&chicago()));
    assert!(!state.loading_restaurants);
    assert_eq!(api.restaurant_requests(), ["Slowtown", "Chicago"]);
}

#[tokio::test]
async fn test_rapid_location_changes_end_on_last() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.set_restaurants("Chicago", chicago());
    api.set_restaurants("Denver", vec![restaurant("d1", "Mile High Greens", "Healthy", "Denver")]);
    let store = new_store(&api);

    for location in ["Austin", "Chicago", "Denver", "Chicago", "Denver"] {
        store.update_location(location);
    }
    store.wait_for_restaurants().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let state = store.snapshot();
    assert_eq!(state.location, "Denver");
    assert_eq!(state.restaurants.len(), 1);
    assert_eq!(state.restaurants[0].name, "Mile High Greens");
}

#[tokio::test]
async fn test_featured_and_lookup() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.set_restaurants("Chicago", chicago());
    let store = new_store(&api);

    store.update_location("Chicago");
    store.wait_for_restaurants().await;

    let featured: Vec<String> = store
        .featured_restaurants()
        .iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(featured, ["c1", "c2", "c3", "c4"]);

    let palace = store
        .find_restaurant(&yummeal_core::RestaurantId::new("c2"))
        .unwrap();
    assert_eq!(palace.name, "Protein Palace");
    assert_eq!(palace.delivery_fee_amount().unwrap().to_string(), "$1.99");
}

#[tokio::test]
async fn test_explore_filters_over_loaded_list() {
    let api = FakeCatalogApi::start().await.unwrap();
    api.set_restaurants("Chicago", chicago());
    let store = new_store(&api);

    store.update_location("Chicago");
    store.wait_for_restaurants().await;
    let state = store.snapshot();

    assert_eq!(
        cuisines(&state.restaurants),
        ["Vegan", "High Protein", "Healthy", "Bowls"]
    );

    let vegan = RestaurantFilter {
        search: String::new(),
        cuisine: Some("Vegan".to_string()),
    };
    let names: Vec<&str> = vegan
        .apply(&state.restaurants)
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, ["Green Garden", "Leaf & Ladle"]);
}
