//! Shopping cart.
//!
//! The cart is an ordered list of lines, one per distinct food item, in the
//! order items were first added. Totals are always computed from the lines.

use serde::{Deserialize, Serialize};

use yummeal_core::{FoodItemId, Price};

use super::food::FoodItem;

/// One food item with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the item taken when it was first added.
    pub item: FoodItem,
    /// Number of units, always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line (`price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.price.times(self.quantity)
    }
}

/// The customer's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `item`.
    ///
    /// If the item is already in the cart its quantity goes up by one and the
    /// stored snapshot is kept; otherwise a new line is appended.
    pub fn add(&mut self, item: &FoodItem) {
        match self.lines.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
            }),
        }
    }

    /// Remove the line for `item_id`. Returns whether a line was removed.
    pub fn remove(&mut self, item_id: &FoodItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.item.id != item_id);
        self.lines.len() != before
    }

    /// Set the quantity of the line for `item_id`.
    ///
    /// A quantity of zero or less removes the line. Unknown IDs are ignored.
    /// Returns whether the cart changed.
    pub fn set_quantity(&mut self, item_id: &FoodItemId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(item_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|line| &line.item.id == item_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `item_id`, if present.
    #[must_use]
    pub fn line(&self, item_id: &FoodItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item.id == item_id)
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
