//! Restaurant listings returned by the catalog API.

use serde::{Deserialize, Serialize};

use yummeal_core::{Price, RestaurantId};

/// A restaurant serving the active location.
///
/// Delivery time, fee and location are display strings as sent by the API
/// (`"15-25 min"`, `"$1.99"`, `"1.2 miles away"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(alias = "_id")]
    pub id: RestaurantId,
    pub name: String,
    pub image: String,
    pub rating: f64,
    pub delivery_time: String,
    pub delivery_fee: String,
    pub cuisine: String,
    pub location: String,
}

impl Restaurant {
    /// The delivery fee as an amount, if the display string is readable.
    #[must_use]
    pub fn delivery_fee_amount(&self) -> Option<Price> {
        self.delivery_fee.parse().ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_format() {
        let restaurant: Restaurant = serde_json::from_str(
            r#"{
                "_id": "r-1",
                "name": "Healthy Bites",
                "image": "https://images.example/healthy.jpg",
                "rating": 4.8,
                "deliveryTime": "15-25 min",
                "deliveryFee": "$1.99",
                "cuisine": "Healthy",
                "location": "Vijayawada"
            }"#,
        )
        .unwrap();

        assert_eq!(restaurant.id.as_str(), "r-1");
        assert_eq!(restaurant.delivery_time, "15-25 min");
        assert_eq!(restaurant.delivery_fee_amount(), Some(Price::from_cents(199)));
    }

    #[test]
    fn test_unreadable_fee() {
        let restaurant = Restaurant {
            id: RestaurantId::new("6"),
            name: "Macro Meals".to_string(),
            image: String::new(),
            rating: 4.4,
            delivery_time: "25-40 min".to_string(),
            delivery_fee: "varies".to_string(),
            cuisine: "Meal Prep".to_string(),
            location: "2.3 miles away".to_string(),
        };
        assert_eq!(restaurant.delivery_fee_amount(), None);
    }
}
