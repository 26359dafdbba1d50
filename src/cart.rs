//! Cart

use crate::products::{Product, ProductId};

/// One line of a cart: a product and how many units of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    product: Product,
    quantity: u32,
}

impl CartEntry {
    /// Create a new entry.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product on this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Units of the product on this line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Shopping cart
///
/// Entries keep insertion order and are unique by [`ProductId`]. Every entry present has a
/// quantity of at least one.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`, merging into an existing entry for the same id.
    ///
    /// Adding zero units is a no-op. Quantities saturate at `u32::MAX`.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(entry) = self.entry_mut(product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            self.entries.push(CartEntry::new(product, quantity));
        }
    }

    /// Replace the quantity for `id`. A quantity of zero removes the entry.
    ///
    /// Returns `false` (and changes nothing) when the cart holds no entry for `id`.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_by_id(id);
        }

        match self.entry_mut(id) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the entry for `id`, reporting whether one was present.
    pub fn remove_by_id(&mut self, id: ProductId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };

        self.entries.remove(position);

        true
    }

    /// Find the entry for `id`.
    pub fn find_by_id(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.product.id == id)
    }

    /// Current quantity for `id`, zero when absent.
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.find_by_id(id).map_or(0, CartEntry::quantity)
    }

    /// An independent, order-preserving copy of the current entries.
    pub fn snapshot(&self) -> Vec<CartEntry> {
        self.entries.clone()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total units across every entry.
    pub fn total_units(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.product.id == id)
    }

    fn entry_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|entry| entry.product.id == id)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::PKR};

    use super::*;

    fn product(id: u32) -> Product {
        Product::new(id, format!("Product {id}"), Money::from_minor(10_000, PKR), "Other")
    }

    #[test]
    fn add_item_creates_entry() {
        let mut cart = Cart::new();

        cart.add_item(product(1), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 2);
    }

    #[test]
    fn repeated_adds_merge_into_one_entry() {
        let mut cart = Cart::new();

        cart.add_item(product(1), 2);
        cart.add_item(product(2), 1);
        cart.add_item(product(1), 3);
        cart.add_item(product(1), 4);

        assert_eq!(cart.len(), 2);
        assert_eq!(
            cart.iter().filter(|e| e.product().id == ProductId::new(1)).count(),
            1
        );
        assert_eq!(cart.quantity_of(ProductId::new(1)), 9);
    }

    #[test]
    fn add_item_with_zero_quantity_is_ignored() {
        let mut cart = Cart::new();

        cart.add_item(product(1), 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn add_item_saturates() {
        let mut cart = Cart::new();

        cart.add_item(product(1), u32::MAX);
        cart.add_item(product(1), 5);

        assert_eq!(cart.quantity_of(ProductId::new(1)), u32::MAX);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut cart = Cart::new();

        cart.add_item(product(3), 1);
        cart.add_item(product(1), 1);
        cart.add_item(product(2), 1);
        cart.add_item(product(3), 1);

        let ids: Vec<u32> = cart.iter().map(|e| e.product().id.get()).collect();

        assert_eq!(ids, [3, 1, 2]);
    }

    #[test]
    fn set_quantity_replaces_quantity() {
        let mut cart = Cart::new();
        cart.add_item(product(1), 5);

        assert!(cart.set_quantity(ProductId::new(1), 2));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 2);
    }

    #[test]
    fn set_quantity_zero_removes_entry() {
        let mut cart = Cart::new();
        cart.add_item(product(1), 5);

        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert!(cart.find_by_id(ProductId::new(1)).is_none());
    }

    #[test]
    fn set_quantity_on_missing_entry_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(product(1), 5);

        assert!(!cart.set_quantity(ProductId::new(2), 3));
        assert!(!cart.set_quantity(ProductId::new(2), 0));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn remove_by_id_reports_whether_removed() {
        let mut cart = Cart::new();
        cart.add_item(product(1), 1);
        cart.add_item(product(2), 1);

        assert!(cart.remove_by_id(ProductId::new(1)));
        assert!(!cart.remove_by_id(ProductId::new(1)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn snapshot_is_independent_of_later_mutation() {
        let mut cart = Cart::new();
        cart.add_item(product(1), 1);
        cart.add_item(product(2), 2);

        let snapshot = cart.snapshot();

        cart.add_item(product(1), 10);
        cart.remove_by_id(ProductId::new(2));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.first().map(CartEntry::quantity), Some(1));
        assert_eq!(snapshot.get(1).map(CartEntry::quantity), Some(2));
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add_item(product(1), 1);

        cart.clear();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_units(), 0);
    }

    #[test]
    fn total_units_sums_quantities() {
        let mut cart = Cart::new();
        cart.add_item(product(1), 2);
        cart.add_item(product(2), 3);

        assert_eq!(cart.total_units(), 5);
    }
}
