//! CLI command implementations.

// Commands write their results to stdout; logs go to stderr.
#![allow(clippy::print_stdout)]

pub mod account;
pub mod catalog;
pub mod order;

use thiserror::Error;

use yummeal_storefront::models::{FoodItem, Restaurant};
use yummeal_storefront::{AuthError, CheckoutError, StoreError};

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The store could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Login or signup failed.
    #[error("{}", .0.user_message())]
    Auth(#[from] AuthError),

    /// The order could not be placed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The restaurant listing failed to load.
    #[error("{0}")]
    Restaurants(String),

    /// No restaurant with this ID at the current location.
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    /// No catalog item with this ID.
    #[error("Unknown food item: {0}")]
    UnknownItem(String),
}

fn print_restaurant(restaurant: &Restaurant) {
    println!(
        "{:>6}  {:<28} {:<14} {:.1}★  {}  delivery {}",
        restaurant.id,
        restaurant.name,
        restaurant.cuisine,
        restaurant.rating,
        restaurant.delivery_time,
        restaurant.delivery_fee,
    );
}

fn print_food(item: &FoodItem) {
    let facts = &item.nutrition;
    println!(
        "{:>3}  {:<26} {:>7}  {:>4} kcal  P {:>2}g  C {:>2}g  F {:>2}g",
        item.id,
        item.name,
        item.price.to_string(),
        facts.calories,
        facts.protein,
        facts.carbs,
        facts.fat,
    );
}
