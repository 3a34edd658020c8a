//! Integration tests for the cart and order placement.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use yummeal_core::{DeliveryMethod, FoodItemId, Price};
use yummeal_integration_tests::{FakeCatalogApi, TEST_ORDER_DELAY};
use yummeal_storefront::catalog::find_food_item;
use yummeal_storefront::models::FoodItem;
use yummeal_storefront::{CheckoutError, MemoryTokenStore, Store};

const EMAIL: &str = "asha@example.com";
const PASSWORD: &str = "correct horse";

fn food(id: &str) -> &'static FoodItem {
    find_food_item(&FoodItemId::new(id)).unwrap()
}

async fn logged_in_store(api: &FakeCatalogApi) -> Store {
    api.add_user("Asha", EMAIL, PASSWORD);
    let store = api.store(Arc::new(MemoryTokenStore::new()));
    assert!(store.login(EMAIL, &SecretString::from(PASSWORD)).await);
    store
}

#[tokio::test]
async fn test_cart_total_uses_exact_decimals() {
    let api = FakeCatalogApi::start().await.unwrap();
    let store = api.store(Arc::new(MemoryTokenStore::new()));

    store.add_to_cart(food("1"));
    store.add_to_cart(food("1"));
    store.add_to_cart(food("2"));

    assert_eq!(store.cart_total(), Price::from_cents(3397));
    assert_eq!(store.cart_total().to_string(), "$33.97");
    assert_eq!(store.cart_item_count(), 3);
}

#[tokio::test]
async fn test_repeated_adds_and_quantity_updates() {
    let api = FakeCatalogApi::start().await.unwrap();
    let store = api.store(Arc::new(MemoryTokenStore::new()));
    let bowl = food("3");

    for _ in 0..4 {
        store.add_to_cart(bowl);
    }
    let cart = store.cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.line(&bowl.id).unwrap().quantity, 4);

    store.update_quantity(&bowl.id, 0);
    assert!(store.cart().is_empty());

    store.add_to_cart(bowl);
    store.update_quantity(&bowl.id, -5);
    assert!(store.cart().is_empty());
}

#[tokio::test]
async fn test_place_order_empties_cart() {
    let api = FakeCatalogApi::start().await.unwrap();
    let store = logged_in_store(&api).await;
    store.add_to_cart(food("1"));
    store.add_to_cart(food("1"));
    store.add_to_cart(food("2"));

    let summary = store.checkout_summary(DeliveryMethod::Delivery);
    let confirmation = store.place_order(DeliveryMethod::Delivery).await.unwrap();

    assert_eq!(confirmation.summary, summary);
    assert_eq!(confirmation.summary.total.to_string(), "$39.95");
    assert_eq!(confirmation.lines.len(), 2);
    assert_eq!(confirmation.method, DeliveryMethod::Delivery);
    assert!(store.cart().is_empty());
    assert!(store.is_logged_in());
}

#[tokio::test]
async fn test_pickup_order_skips_delivery_fee() {
    let api = FakeCatalogApi::start().await.unwrap();
    let store = logged_in_store(&api).await;
    store.add_to_cart(food("4"));

    let confirmation = store.place_order(DeliveryMethod::Pickup).await.unwrap();

    assert_eq!(confirmation.summary.delivery_fee, Price::ZERO);
    assert_eq!(confirmation.summary.total.to_string(), "$12.98");
}

#[tokio::test]
async fn test_items_added_during_processing_survive() {
    let api = FakeCatalogApi::start().await.unwrap();
    let store = logged_in_store(&api).await;
    store.add_to_cart(food("5"));

    let placing = tokio::spawn({
        let store = store.clone();
        async move { store.place_order(DeliveryMethod::Delivery).await }
    });

    tokio::time::sleep(TEST_ORDER_DELAY / 4).await;
    store.add_to_cart(food("6"));
    store.add_to_cart(food("5"));

    let confirmation = placing.await.unwrap().unwrap();
    assert_eq!(confirmation.lines.len(), 1);
    assert_eq!(confirmation.lines[0].quantity, 1);

    let cart = store.cart();
    assert_eq!(cart.line(&FoodItemId::new("5")).unwrap().quantity, 1);
    assert_eq!(cart.line(&FoodItemId::new("6")).unwrap().quantity, 1);
}

#[tokio::test]
async fn test_place_order_preconditions() {
    let api = FakeCatalogApi::start().await.unwrap();
    let store = api.store(Arc::new(MemoryTokenStore::new()));
    store.add_to_cart(food("7"));

    assert_eq!(
        store.place_order(DeliveryMethod::Delivery).await.unwrap_err(),
        CheckoutError::NotAuthenticated
    );
    assert_eq!(store.cart_item_count(), 1);

    let api = FakeCatalogApi::start().await.unwrap();
    let store = logged_in_store(&api).await;
    assert_eq!(
        store.place_order(DeliveryMethod::Delivery).await.unwrap_err(),
        CheckoutError::EmptyCart
    );
}

#[tokio::test]
async fn test_order_processing_takes_configured_delay() {
    let api = FakeCatalogApi::start().await.unwrap();
    let store = logged_in_store(&api).await;
    store.add_to_cart(food("8"));

    let started = tokio::time::Instant::now();
    store.place_order(DeliveryMethod::Delivery).await.unwrap();

    assert!(started.elapsed() >= TEST_ORDER_DELAY);
    assert!(started.elapsed() < TEST_ORDER_DELAY + Duration::from_secs(5));
}
