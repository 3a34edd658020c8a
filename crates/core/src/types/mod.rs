//! Core types for Yummeal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod delivery;
pub mod email;
pub mod id;
pub mod nutrition;
pub mod price;

pub use delivery::{DeliveryMethod, ParseDeliveryMethodError};
pub use email::{Email, EmailError};
pub use id::*;
pub use nutrition::Nutrition;
pub use price::{ParsePriceError, Price};
