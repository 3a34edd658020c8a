//! Order placement.
//!
//! # Usage
//!
//! ```bash
//! # Two of item 1 and one of item 7, delivered
//! yummeal order --item 1:2 --item 7
//!
//! # Collect it instead
//! yummeal order --item 4 --pickup
//! ```
//!
//! Requires a stored session (see `yummeal login`).

use yummeal_core::{DeliveryMethod, FoodItemId};
use yummeal_storefront::checkout::OrderSummary;
use yummeal_storefront::{Store, StoreConfig, catalog};

use super::CommandError;

/// One `--item` argument: a catalog ID and a quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub id: FoodItemId,
    pub quantity: u32,
}

impl ItemSpec {
    /// Parse `ID` or `ID:QTY`; the quantity must be at least 1.
    ///
    /// # Errors
    ///
    /// Returns a message describing the malformed argument.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (id, quantity) = match s.split_once(':') {
            Some((id, quantity)) => {
                let quantity = quantity
                    .parse::<u32>()
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or_else(|| format!("invalid quantity in '{s}': expected a positive number"))?;
                (id, quantity)
            }
            None => (s, 1),
        };

        if id.trim().is_empty() {
            return Err(format!("missing item ID in '{s}'"));
        }

        Ok(Self {
            id: FoodItemId::new(id.trim()),
            quantity,
        })
    }
}

/// Fill a cart with `items` and place the order.
///
/// # Errors
///
/// Returns an error for unknown items, a missing session or an empty cart.
pub async fn place(config: &StoreConfig, items: &[ItemSpec], pickup: bool) -> Result<(), CommandError> {
    let store = Store::open(config).await?;
    let method = if pickup {
        DeliveryMethod::Pickup
    } else {
        DeliveryMethod::Delivery
    };

    for spec in items {
        let item = catalog::find_food_item(&spec.id)
            .ok_or_else(|| CommandError::UnknownItem(spec.id.to_string()))?;
        store.add_to_cart(item);
        let quantity = store
            .cart()
            .line(&spec.id)
            .map_or(0, |line| line.quantity)
            .saturating_add(spec.quantity)
            .saturating_sub(1);
        store.update_quantity(&spec.id, i64::from(quantity));
    }

    for line in store.cart().lines() {
        println!(
            "{:>3} × {:<26} {:>8}",
            line.quantity,
            line.item.name,
            line.line_total().to_string()
        );
    }
    print_summary(&store.checkout_summary(method));

    println!("\nProcessing payment...");
    let confirmation = store.place_order(method).await?;
    println!(
        "Order {} placed for {} ({})",
        confirmation.id, confirmation.summary.total, confirmation.method
    );
    Ok(())
}

fn print_summary(summary: &OrderSummary) {
    println!("{:<32} {:>8}", "Subtotal", summary.subtotal.to_string());
    println!("{:<32} {:>8}", "Delivery fee", summary.delivery_fee.to_string());
    println!("{:<32} {:>8}", "Service fee", summary.service_fee.to_string());
    println!("{:<32} {:>8}", "Total", summary.total.to_string());
}
