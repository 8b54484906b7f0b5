//! Catalog records as served by the upstream API.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CategoryId, ProductId, SizeId};
use super::price::Price;

/// A product category.
///
/// Used both for the global category list and for the per-product
/// category enrichment; the upstream shape is the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// A product size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub size_id: SizeId,
    pub size_label: String,
}

/// A catalog product merged with its categories and sizes.
///
/// Products are immutable once fetched; a re-fetch replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_description: String,
    pub product_price: Price,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_image: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sizes: Vec<Size>,
}

impl Product {
    /// Whether the product is tagged with the given category.
    #[must_use]
    pub fn is_in_category(&self, category_id: CategoryId) -> bool {
        self.categories
            .iter()
            .any(|category| category.category_id == category_id)
    }

    /// The size pre-selected in the detail popup (the first one listed).
    #[must_use]
    pub fn default_size(&self) -> Option<&Size> {
        self.sizes.first()
    }

    /// Whether `size_id` is one of this product's sizes.
    #[must_use]
    pub fn has_size(&self, size_id: SizeId) -> bool {
        self.sizes.iter().any(|size| size.size_id == size_id)
    }

    /// Whether `quantity` can be requested for this product.
    #[must_use]
    pub const fn accepts_quantity(&self, quantity: u32) -> bool {
        quantity >= 1 && quantity <= self.stock
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_without_enrichment_has_empty_lists() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "product_id": 3,
            "product_name": "Canvas Tote",
            "product_description": "A bag",
            "product_price": 12.5,
            "product_image": "https://img.example/tote.png",
            "stock": 4
        }))
        .unwrap();

        assert!(product.categories.is_empty());
        assert!(product.sizes.is_empty());
        assert_eq!(product.product_price, Price::from_cents(1250));
        assert!(product.default_size().is_none());
    }

    #[test]
    fn test_product_null_lists_become_empty() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "product_id": 3,
            "product_name": "Canvas Tote",
            "product_description": null,
            "product_price": "12.50",
            "product_image": null,
            "stock": 0,
            "categories": null,
            "sizes": null
        }))
        .unwrap();

        assert!(product.categories.is_empty());
        assert!(product.sizes.is_empty());
        assert!(product.product_description.is_empty());
    }

    #[test]
    fn test_product_category_and_size_lookup() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "product_id": 1,
            "product_name": "Tee",
            "product_description": "",
            "product_price": 10,
            "product_image": "",
            "stock": 5,
            "categories": [{ "category_id": 2, "category_name": "Shirts" }],
            "sizes": [
                { "size_id": 7, "size_label": "M" },
                { "size_id": 8, "size_label": "L" }
            ]
        }))
        .unwrap();

        assert!(product.is_in_category(CategoryId::new(2)));
        assert!(!product.is_in_category(CategoryId::new(3)));
        assert_eq!(product.default_size().unwrap().size_label, "M");
        assert!(product.has_size(SizeId::new(8)));
        assert!(!product.has_size(SizeId::new(9)));
    }

    #[test]
    fn test_accepts_quantity_bounds() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "product_id": 1,
            "product_name": "Tee",
            "product_price": 10,
            "stock": 3
        }))
        .unwrap();

        assert!(!product.accepts_quantity(0));
        assert!(product.accepts_quantity(1));
        assert!(product.accepts_quantity(3));
        assert!(!product.accepts_quantity(4));
    }
}
