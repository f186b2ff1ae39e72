//! In-memory shopping cart.
//!
//! Lines are keyed by item id and kept in insertion order, which is the
//! display order. A line never holds a quantity below one: any operation that
//! would take it there removes the line instead.

use serde::{Deserialize, Serialize};

use super::catalog::Plant;
use super::id::PlantId;
use super::price::Price;

/// The subset of a plant the cart needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: PlantId,
    pub name: String,
    pub price: Price,
}

impl From<&Plant> for CartItem {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id.clone(),
            name: plant.name.clone(),
            price: plant.price,
        }
    }
}

/// One cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CartItem,
    pub quantity: u32,
}

impl CartLine {
    /// Price of the whole line.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.item.price.times(self.quantity)
    }
}

/// Shopping cart owning all of its lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
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
    /// An item already in the cart keeps its original name and price.
    pub fn add(&mut self, item: CartItem) {
        match self.position(&item.id) {
            Some(index) => {
                if let Some(line) = self.lines.get_mut(index) {
                    line.quantity = line.quantity.saturating_add(1);
                }
            }
            None => self.lines.push(CartLine { item, quantity: 1 }),
        }
    }

    /// Change the quantity of `id` by `delta`.
    ///
    /// Unknown ids are ignored. A resulting quantity of zero or less removes
    /// the line.
    pub fn update_quantity(&mut self, id: &PlantId, delta: i64) {
        let Some(index) = self.position(id) else {
            return;
        };
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };

        let quantity = i64::from(line.quantity).saturating_add(delta);
        if quantity <= 0 {
            self.lines.remove(index);
        } else {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove the line for `id`, if any.
    pub fn remove(&mut self, id: &PlantId) {
        self.lines.retain(|line| &line.item.id != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_price).sum()
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity held for `id` (zero when absent).
    #[must_use]
    pub fn quantity_of(&self, id: &PlantId) -> u32 {
        self.lines
            .iter()
            .find(|line| &line.item.id == id)
            .map_or(0, |line| line.quantity)
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

    fn position(&self, id: &PlantId) -> Option<usize> {
        self.lines.iter().position(|line| &line.item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: u32) -> CartItem {
        CartItem {
            id: PlantId::new(id),
            name: format!("Plant {id}"),
            price: Price::from(price),
        }
    }

    #[test]
    fn test_repeated_add_accumulates_quantity() {
        let mut cart = Cart::new();
        for _ in 0..7 {
            cart.add(item("1", 12));
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(&PlantId::new("1")), 7);
        assert_eq!(cart.total(), Price::from(84));
    }

    #[test]
    fn test_decrement_to_zero_removes_line_without_resurrection() {
        let mut cart = Cart::new();
        let id = PlantId::new("1");
        cart.add(item("1", 5));
        cart.add(item("1", 5));

        cart.update_quantity(&id, -2);
        assert!(cart.is_empty());

        cart.update_quantity(&id, 1);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of(&id), 0);
    }

    #[test]
    fn test_large_negative_delta_removes_line() {
        let mut cart = Cart::new();
        cart.add(item("1", 5));
        cart.update_quantity(&PlantId::new("1"), -10);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increment_existing_line() {
        let mut cart = Cart::new();
        cart.add(item("1", 5));
        cart.update_quantity(&PlantId::new("1"), 1);
        assert_eq!(cart.quantity_of(&PlantId::new("1")), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(item("1", 5));
        cart.add(item("2", 7));

        cart.remove(&PlantId::new("1"));
        let once = cart.clone();
        cart.remove(&PlantId::new("1"));

        assert_eq!(cart, once);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_clear_resets_total() {
        let mut cart = Cart::new();
        cart.add(item("1", 5));
        cart.add(item("2", 7));
        cart.clear();
        assert_eq!(cart.total().display(), "$0");
    }

    #[test]
    fn test_three_items_then_remove_middle() {
        let mut cart = Cart::new();
        cart.add(item("a", 10));
        cart.add(item("b", 20));
        cart.add(item("c", 30));
        assert_eq!(cart.total().display(), "$60");

        cart.remove(&PlantId::new("b"));
        assert_eq!(cart.total().display(), "$40");
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(item("b", 1));
        cart.add(item("a", 1));
        cart.add(item("b", 1));
        let ids: Vec<_> = cart.lines().iter().map(|l| l.item.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_existing_line_keeps_first_price() {
        let mut cart = Cart::new();
        cart.add(item("1", 5));
        cart.add(CartItem {
            price: Price::from(50),
            ..item("1", 5)
        });
        assert_eq!(cart.total(), Price::from(10));
    }
}
