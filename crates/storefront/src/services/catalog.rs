//! Catalog service: products with their categories and sizes.

use eashop_core::{Category, Product, ProductId, Size};
use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::api::envelope::{self, CATEGORIES, PRODUCT, SIZES};
use crate::api::{ApiClient, ApiError};

/// Message used when `/products` does not hold a list.
pub const INVALID_PRODUCTS: &str = "Invalid products data format";

/// Read-only access to products, categories, and sizes.
///
/// Nothing is cached; each call goes to the upstream API.
#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
}

impl CatalogService {
    /// Create a catalog service over an API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch every product, enriched with its categories and sizes.
    ///
    /// Enrichment requests for all products are issued concurrently and the
    /// call completes once every one of them has settled.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Malformed`] if the product payload is not a list,
    /// or the first error from any product's enrichment.
    #[instrument(skip(self))]
    pub async fn get_all_products(&self) -> Result<Vec<Product>, ApiError> {
        let body = self.api.get("/products").await.inspect_err(|e| {
            tracing::error!(error = %e, "Error fetching products");
        })?;
        let products: Vec<Product> = envelope::required_list(body, PRODUCT, INVALID_PRODUCTS)?;

        debug!(count = products.len(), "Enriching products");

        try_join_all(products.into_iter().map(|product| self.enrich(product))).await
    }

    /// Attach categories and sizes to one product.
    async fn enrich(&self, mut product: Product) -> Result<Product, ApiError> {
        let (categories, sizes) = tokio::try_join!(
            self.get_product_category(product.product_id),
            self.get_product_sizes(product.product_id),
        )?;

        product.categories = categories;
        product.sizes = sizes;
        Ok(product)
    }

    /// Fetch a single product record, without categories or sizes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload holds no product.
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let body = self
            .api
            .get(&format!("/products/{product_id}"))
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, %product_id, "Error fetching product");
            })?;

        envelope::required_item(body, PRODUCT)
    }

    /// Fetch the categories a product belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a list.
    #[instrument(skip(self))]
    pub async fn get_product_category(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Category>, ApiError> {
        let body = self
            .api
            .get(&format!("/products/{product_id}/categories"))
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, %product_id, "Error fetching categories for product");
            })?;

        envelope::optional_list(body, CATEGORIES)
    }

    /// Fetch the sizes a product is offered in.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a list.
    #[instrument(skip(self))]
    pub async fn get_product_sizes(&self, product_id: ProductId) -> Result<Vec<Size>, ApiError> {
        let body = self
            .api
            .get(&format!("/products/{product_id}/sizes"))
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, %product_id, "Error fetching sizes for product");
            })?;

        envelope::optional_list(body, SIZES)
    }

    /// Fetch the global category list for the filter bar.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; a non-list payload reads as
    /// an empty list.
    #[instrument(skip(self))]
    pub async fn get_all_product_category(&self) -> Result<Vec<Category>, ApiError> {
        let body = self.api.get("/categories").await.inspect_err(|e| {
            tracing::error!(error = %e, "Error fetching product categories");
        })?;

        envelope::list_or_empty(body, CATEGORIES)
    }

    /// Fetch the global size list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; a non-list payload reads as
    /// an empty list.
    #[instrument(skip(self))]
    pub async fn get_all_product_sizes(&self) -> Result<Vec<Size>, ApiError> {
        let body = self.api.get("/sizes").await.inspect_err(|e| {
            tracing::error!(error = %e, "Error fetching product sizes");
        })?;

        envelope::list_or_empty(body, SIZES)
    }
}
