//! Cart service: one user's cart rows and the mutations on them.
//!
//! Failures are logged and swallowed; callers never see an error. Every
//! mutation is followed by a re-fetch, which keeps the total-quantity
//! counter behind the nav badge current.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use eashop_core::{CartItem, NewCartItem, ProductId, SizeId, UserId};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::envelope::{self, CARTS};
use crate::api::{ApiClient, ApiError};

/// Body of a quantity edit.
#[derive(Debug, Serialize)]
struct QuantityUpdate {
    quantity: u32,
}

/// Cart operations for a single, configured user.
#[derive(Clone)]
pub struct CartService {
    api: ApiClient,
    user_id: UserId,
    item_count: Arc<AtomicU32>,
}

impl CartService {
    /// Create a cart service whose reads are filtered to `user_id`.
    #[must_use]
    pub fn new(api: ApiClient, user_id: UserId) -> Self {
        Self {
            api,
            user_id,
            item_count: Arc::new(AtomicU32::new(0)),
        }
    }

    /// The user this service reads and writes the cart for.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Total quantity across the last successfully fetched cart.
    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.item_count.load(Ordering::Relaxed)
    }

    /// Fetch the cart rows belonging to this service's user.
    ///
    /// Returns `None` if the fetch fails; the error is logged.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn get_cart(&self) -> Option<Vec<CartItem>> {
        match self.fetch_cart().await {
            Ok(items) => {
                self.update_cart_count(&items);
                Some(items)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching cart");
                None
            }
        }
    }

    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        let body = self.api.get("/cart").await?;
        let items: Vec<CartItem> = envelope::list_or_empty(body, CARTS)?;

        let filtered: Vec<CartItem> = items
            .into_iter()
            .filter(|item| item.user_id == self.user_id)
            .collect();

        debug!(count = filtered.len(), "Fetched cart items");
        Ok(filtered)
    }

    /// Add a line to the cart, then re-fetch.
    #[instrument(skip(self))]
    pub async fn insert_product_to_cart(&self, item: &NewCartItem) {
        match self.api.post("/cart", item).await {
            Ok(response) => debug!(?response, "Product added to cart"),
            Err(e) => tracing::error!(error = %e, "Error adding product to cart"),
        }
        self.get_cart().await;
    }

    /// Set the quantity of a cart line, then re-fetch.
    #[instrument(skip(self))]
    pub async fn edit_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        size_id: SizeId,
        quantity: u32,
    ) {
        let path = line_path(user_id, product_id, size_id);
        match self.api.put(&path, &QuantityUpdate { quantity }).await {
            Ok(response) => debug!(?response, "Cart updated"),
            Err(e) => tracing::error!(error = %e, "Error editing cart"),
        }
        self.get_cart().await;
    }

    /// Delete a cart line, then re-fetch.
    #[instrument(skip(self))]
    pub async fn delete_item_from_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        size_id: SizeId,
    ) {
        let path = line_path(user_id, product_id, size_id);
        match self.api.delete(&path).await {
            Ok(response) => debug!(?response, "Item deleted from cart"),
            Err(e) => tracing::error!(error = %e, "Error deleting item from cart"),
        }
        self.get_cart().await;
    }

    fn update_cart_count(&self, items: &[CartItem]) {
        let total = total_quantity(items);
        self.item_count.store(total, Ordering::Relaxed);
    }
}

fn line_path(user_id: UserId, product_id: ProductId, size_id: SizeId) -> String {
    format!("/cart/{user_id}/{product_id}/{size_id}")
}

/// Sum of quantities, saturating instead of overflowing.
#[must_use]
pub fn total_quantity(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
}
