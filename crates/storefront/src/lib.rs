//! Yummeal storefront library.
//!
//! The session and cart [`Store`] for the Yummeal food-delivery storefront,
//! together with the catalog API client, token storage, the bundled food
//! catalog, catalog filters and checkout pricing.
//!
//! # Example
//!
//! ```rust,ignore
//! use yummeal_storefront::{Store, StoreConfig};
//!
//! let store = Store::open(&StoreConfig::from_env()?).await?;
//! store.wait_for_restaurants().await;
//!
//! for restaurant in store.featured_restaurants() {
//!     println!("{}", restaurant.name);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod store;
pub mod token_store;

pub use api::{ApiError, CatalogClient};
pub use checkout::{CheckoutError, OrderConfirmation, OrderSummary};
pub use config::{ConfigError, StoreConfig};
pub use error::{AuthError, StoreError};
pub use store::{Store, StoreState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
