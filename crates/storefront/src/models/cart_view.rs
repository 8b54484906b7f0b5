//! The visitor's local cart: fetched rows plus selection state.
//!
//! Mutations here are applied before (and regardless of) the matching
//! upstream call, and are never reconciled with the server afterwards.

use eashop_core::{CartItem, CartLineKey, Price};
use serde::{Deserialize, Serialize};

/// Local cart state kept in the visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    items: Vec<CartItem>,
    all_selected: bool,
}

impl CartView {
    /// Start from freshly fetched rows, nothing selected.
    #[must_use]
    pub const fn new(items: Vec<CartItem>) -> Self {
        Self {
            items,
            all_selected: false,
        }
    }

    /// Cart rows in display order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// State of the "Select All" checkbox.
    #[must_use]
    pub const fn all_selected(&self) -> bool {
        self.all_selected
    }

    /// Look up a row by its identity.
    #[must_use]
    pub fn item(&self, key: CartLineKey) -> Option<&CartItem> {
        self.items.iter().find(|item| item.key() == key)
    }

    fn item_mut(&mut self, key: CartLineKey) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.key() == key)
    }

    /// Select or deselect every row.
    pub fn select_all(&mut self, checked: bool) {
        self.all_selected = checked;
        for item in &mut self.items {
            item.selected = checked;
        }
    }

    /// Flip one row's selection. Returns the new state, or `None` if the
    /// row is not in the cart.
    pub fn toggle_selection(&mut self, key: CartLineKey) -> Option<bool> {
        let item = self.item_mut(key)?;
        item.selected = !item.selected;
        Some(item.selected)
    }

    /// Step a row's quantity down, never below 1. Returns the new quantity.
    pub fn decrease_quantity(&mut self, key: CartLineKey) -> Option<u32> {
        let item = self.item_mut(key)?;
        item.quantity = item.quantity.saturating_sub(1).max(1);
        Some(item.quantity)
    }

    /// Step a row's quantity up. Returns the new quantity.
    pub fn increase_quantity(&mut self, key: CartLineKey) -> Option<u32> {
        let item = self.item_mut(key)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(item.quantity)
    }

    /// Set a row's quantity from raw input, clamped to at least 1.
    /// Returns the stored quantity.
    pub fn set_quantity(&mut self, key: CartLineKey, input: &str) -> Option<u32> {
        let item = self.item_mut(key)?;
        item.quantity = clamp_quantity(input);
        Some(item.quantity)
    }

    /// Remove exactly the row with this identity. Returns whether a row
    /// was removed.
    pub fn remove(&mut self, key: CartLineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.key() != key);
        self.items.len() != before
    }

    /// Whether any row is selected.
    #[must_use]
    pub fn has_selected_items(&self) -> bool {
        self.items.iter().any(|item| item.selected)
    }

    /// Sum of `price × quantity` over selected rows.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items
            .iter()
            .filter(|item| item.selected)
            .map(CartItem::line_total)
            .sum()
    }

    /// Checkout is offered only for a non-zero subtotal.
    #[must_use]
    pub fn checkout_enabled(&self) -> bool {
        !self.subtotal().is_zero()
    }
}

/// Parse a quantity typed by the visitor, clamping to `1..=u32::MAX`.
///
/// Input that is not a number is read as 1.
#[must_use]
pub fn clamp_quantity(input: &str) -> u32 {
    let trimmed = input.trim();
    let parsed = trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(truncate_float));

    parsed.map_or(1, |value| {
        u32::try_from(value.max(1)).unwrap_or(u32::MAX)
    })
}

#[allow(clippy::cast_possible_truncation)] // saturating float-to-int cast is the intent
fn truncate_float(value: f64) -> i64 {
    if value.is_nan() { 1 } else { value as i64 }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eashop_core::{ProductId, SizeId, UserId};

    use super::*;

    fn item(product: i32, size: i32, quantity: u32, cents: i64) -> CartItem {
        CartItem {
            user_id: UserId::new(1),
            product_id: ProductId::new(product),
            size_id: SizeId::new(size),
            quantity,
            selected: false,
            product_price: Price::from_cents(cents),
            product_name: format!("Product {product}"),
            product_image: String::new(),
            size_label: format!("Size {size}"),
        }
    }

    fn key(product: i32, size: i32) -> CartLineKey {
        CartLineKey::new(ProductId::new(product), SizeId::new(size))
    }

    fn cart() -> CartView {
        CartView::new(vec![
            item(1, 1, 2, 1000),
            item(1, 2, 1, 1200),
            item(2, 1, 3, 250),
        ])
    }

    #[test]
    fn test_subtotal_counts_only_selected_rows() {
        let mut cart = cart();
        assert!(cart.subtotal().is_zero());
        assert!(!cart.has_selected_items());
        assert!(!cart.checkout_enabled());

        cart.toggle_selection(key(1, 1));
        cart.toggle_selection(key(2, 1));

        // 2 × 10.00 + 3 × 2.50
        assert_eq!(cart.subtotal(), Price::from_cents(2750));
        assert!(cart.has_selected_items());
        assert!(cart.checkout_enabled());
    }

    #[test]
    fn test_select_all_and_back() {
        let mut cart = cart();

        cart.select_all(true);
        assert!(cart.all_selected());
        assert!(cart.items().iter().all(|item| item.selected));
        assert_eq!(cart.subtotal(), Price::from_cents(2000 + 1200 + 750));

        cart.select_all(false);
        assert!(!cart.all_selected());
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_toggle_unknown_row() {
        let mut cart = cart();
        assert_eq!(cart.toggle_selection(key(9, 9)), None);
        assert_eq!(cart.toggle_selection(key(1, 2)), Some(true));
        assert_eq!(cart.toggle_selection(key(1, 2)), Some(false));
    }

    #[test]
    fn test_decrease_never_goes_below_one() {
        let mut cart = cart();
        assert_eq!(cart.decrease_quantity(key(1, 1)), Some(1));
        assert_eq!(cart.decrease_quantity(key(1, 1)), Some(1));
        assert_eq!(cart.decrease_quantity(key(1, 2)), Some(1));
    }

    #[test]
    fn test_increase_quantity() {
        let mut cart = cart();
        assert_eq!(cart.increase_quantity(key(2, 1)), Some(4));
        assert_eq!(cart.item(key(2, 1)).unwrap().quantity, 4);
        assert_eq!(cart.increase_quantity(key(5, 5)), None);
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = cart();
        assert_eq!(cart.set_quantity(key(1, 1), "0"), Some(1));
        assert_eq!(cart.set_quantity(key(1, 1), "-4"), Some(1));
        assert_eq!(cart.set_quantity(key(1, 1), "7"), Some(7));
        assert_eq!(cart.set_quantity(key(1, 1), "abc"), Some(1));
    }

    #[test]
    fn test_remove_one_size_leaves_the_other_untouched() {
        let mut cart = cart();
        cart.toggle_selection(key(1, 2));
        cart.increase_quantity(key(1, 2));

        assert!(cart.remove(key(1, 1)));

        assert_eq!(cart.items().len(), 2);
        assert!(cart.item(key(1, 1)).is_none());
        let other_size = cart.item(key(1, 2)).unwrap();
        assert_eq!(other_size.quantity, 2);
        assert!(other_size.selected);
        assert_eq!(cart.item(key(2, 1)).unwrap().quantity, 3);
    }

    #[test]
    fn test_remove_missing_row_is_noop() {
        let mut cart = cart();
        assert!(!cart.remove(key(3, 3)));
        assert_eq!(cart.items().len(), 3);
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity("5"), 5);
        assert_eq!(clamp_quantity(" 12 "), 12);
        assert_eq!(clamp_quantity("0"), 1);
        assert_eq!(clamp_quantity("-1"), 1);
        assert_eq!(clamp_quantity(""), 1);
        assert_eq!(clamp_quantity("2.7"), 2);
        assert_eq!(clamp_quantity("NaN"), 1);
        assert_eq!(clamp_quantity("99999999999"), u32::MAX);
    }

    #[test]
    fn test_cart_view_survives_session_round_trip() {
        let mut cart = cart();
        cart.toggle_selection(key(2, 1));

        let json = serde_json::to_value(&cart).unwrap();
        let restored: CartView = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }
}
