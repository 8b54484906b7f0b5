//! Catalog page state: load outcome and client-side filtering.

use eashop_core::{CategoryId, Product};

use crate::api::ApiError;

/// Message shown when the product list cannot be loaded.
pub const LOAD_ERROR: &str = "Failed to load products";

/// Maximum characters of a product name shown on a card.
pub const CARD_NAME_CHARS: usize = 20;

/// Maximum characters of a product description shown on a card.
pub const CARD_DESCRIPTION_CHARS: usize = 50;

/// Outcome of loading the catalog for one page view.
///
/// The loading state is the in-flight request itself, so only the two
/// settled states are represented.
#[derive(Debug, Clone)]
pub enum CatalogState {
    /// Products were fetched and enriched.
    Ready(Vec<Product>),
    /// The load failed; holds the page-level message.
    Failed(String),
}

impl CatalogState {
    /// Settle a catalog load. Errors are logged and replaced by a generic
    /// message.
    #[must_use]
    pub fn from_result(result: Result<Vec<Product>, ApiError>) -> Self {
        match result {
            Ok(products) => Self::Ready(products),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load products");
                Self::Failed(LOAD_ERROR.to_string())
            }
        }
    }

    /// The fetched products, or an empty slice after a failure.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            Self::Ready(products) => products,
            Self::Failed(_) => &[],
        }
    }

    /// The error message, if the load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Failed(message) => Some(message),
        }
    }
}

/// Category and search filter over the fetched product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Only products tagged with this category; `None` keeps all.
    pub category: Option<CategoryId>,
    /// Case-insensitive substring of the product name; empty keeps all.
    pub search: String,
}

impl CatalogFilter {
    /// Create a filter.
    #[must_use]
    pub fn new(category: Option<CategoryId>, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    /// Whether a product passes both the category and the search filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_category = self
            .category
            .is_none_or(|category_id| product.is_in_category(category_id));
        let matches_search = product
            .product_name
            .to_lowercase()
            .contains(&self.search.to_lowercase());

        matches_category && matches_search
    }

    /// Products passing the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .collect()
    }
}

/// Shorten `text` to `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars).collect();
    short.push_str("...");
    short
}
