//! Yummeal Core - Shared types library.
//!
//! This crate provides common types used across all Yummeal components:
//! - `storefront` - Session/cart store, catalog API client and checkout
//! - `cli` - Command-line front end driving the store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, nutrition facts
//!   and delivery methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
