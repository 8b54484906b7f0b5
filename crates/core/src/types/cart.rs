//! Cart line records.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, SizeId, UserId};
use super::price::Price;

/// Identity of a cart line: one product in one size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLineKey {
    pub product_id: ProductId,
    pub size_id: SizeId,
}

impl CartLineKey {
    #[must_use]
    pub const fn new(product_id: ProductId, size_id: SizeId) -> Self {
        Self {
            product_id,
            size_id,
        }
    }
}

/// A row of the upstream cart, with product details denormalized in.
///
/// `selected` never comes from the server; it is the visitor's checkbox
/// state and defaults to unselected on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub size_id: SizeId,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub selected: bool,
    pub product_price: Price,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_image: String,
    #[serde(default)]
    pub size_label: String,
}

impl CartItem {
    /// The `(product_id, size_id)` identity of this line.
    #[must_use]
    pub const fn key(&self) -> CartLineKey {
        CartLineKey::new(self.product_id, self.size_id)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product_price.times(self.quantity)
    }
}

/// Request body for adding a line to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub size_id: SizeId,
    pub quantity: u32,
}
