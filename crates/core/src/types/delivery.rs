//! How a placed order reaches the customer.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown delivery method.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid delivery method: {0} (expected delivery or pickup)")]
pub struct ParseDeliveryMethodError(String);

/// Order fulfilment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Courier delivery to the customer's address; carries a delivery fee.
    #[default]
    Delivery,
    /// Customer collects the order from the restaurant.
    Pickup,
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivery => write!(f, "delivery"),
            Self::Pickup => write!(f, "pickup"),
        }
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = ParseDeliveryMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            _ => Err(ParseDeliveryMethodError(s.to_owned())),
        }
    }
}
