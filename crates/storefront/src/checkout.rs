//! Checkout: order pricing and confirmations.
//!
//! Payment is simulated; no order is sent to the catalog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use yummeal_core::{DeliveryMethod, OrderId, Price};

use crate::models::{Cart, CartLine};

/// Flat delivery fee charged for delivered orders.
pub const DELIVERY_FEE: Price = Price::from_cents(399);
/// Service fee charged on every order.
pub const SERVICE_FEE: Price = Price::from_cents(199);

/// Errors that prevent an order from being placed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// No customer is logged in.
    #[error("log in to place an order")]
    NotAuthenticated,

    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,
}

/// Price breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub service_fee: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Price the current contents of `cart`.
    #[must_use]
    pub fn for_cart(cart: &Cart, method: DeliveryMethod) -> Self {
        let subtotal = cart.total();
        let delivery_fee = match method {
            DeliveryMethod::Delivery => DELIVERY_FEE,
            DeliveryMethod::Pickup => Price::ZERO,
        };

        Self {
            subtotal,
            delivery_fee,
            service_fee: SERVICE_FEE,
            total: subtotal + delivery_fee + SERVICE_FEE,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub method: DeliveryMethod,
    /// The lines as they were when the order was placed.
    pub lines: Vec<CartLine>,
    pub summary: OrderSummary,
}

impl OrderConfirmation {
    pub(crate) fn new(cart: &Cart, method: DeliveryMethod) -> Self {
        Self {
            id: OrderId::generate(),
            placed_at: Utc::now(),
            method,
            lines: cart.lines().to_vec(),
            summary: OrderSummary::for_cart(cart, method),
        }
    }
}
