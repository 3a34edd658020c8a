//! Domain models for the storefront.
//!
//! Wire names follow the catalog API (`camelCase`); field names follow Rust.

pub mod cart;
pub mod food;
pub mod restaurant;
pub mod session;
pub mod user;

pub use cart::{Cart, CartLine};
pub use food::FoodItem;
pub use restaurant::Restaurant;
pub use user::{Address, User};
