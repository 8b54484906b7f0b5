//! Catalog listing commands.

use eashop_core::{CategoryId, Product};
use eashop_storefront::models::CatalogFilter;
use eashop_storefront::services::CatalogService;

use super::{CommandError, connect};

/// List products, optionally filtered by category and name.
#[allow(clippy::print_stdout)]
pub async fn products(category: Option<i32>, search: Option<&str>) -> Result<(), CommandError> {
    let (api, _) = connect()?;
    let products = CatalogService::new(api).get_all_products().await?;

    let filter = CatalogFilter::new(category.map(CategoryId::new), search.unwrap_or_default());
    let matching = filter.apply(&products);

    tracing::info!("{} of {} products match", matching.len(), products.len());
    for product in matching {
        println!("{}", product_line(product));
    }
    Ok(())
}

/// List all categories.
#[allow(clippy::print_stdout)]
pub async fn categories() -> Result<(), CommandError> {
    let (api, _) = connect()?;
    let categories = CatalogService::new(api).get_all_product_category().await?;

    for category in categories {
        println!("{:>5}  {}", category.category_id, category.category_name);
    }
    Ok(())
}

/// List all sizes.
#[allow(clippy::print_stdout)]
pub async fn sizes() -> Result<(), CommandError> {
    let (api, _) = connect()?;
    let sizes = CatalogService::new(api).get_all_product_sizes().await?;

    for size in sizes {
        println!("{:>5}  {}", size.size_id, size.size_label);
    }
    Ok(())
}

/// One-line summary of a product.
fn product_line(product: &Product) -> String {
    let categories: Vec<&str> = product
        .categories
        .iter()
        .map(|c| c.category_name.as_str())
        .collect();
    let sizes: Vec<&str> = product
        .sizes
        .iter()
        .map(|s| s.size_label.as_str())
        .collect();

    format!(
        "{:>5}  {:<30} {:>10}  stock {:<4} [{}] ({})",
        product.product_id,
        product.product_name,
        product.product_price.to_string(),
        product.stock,
        categories.join(", "),
        sizes.join("/"),
    )
}

#[cfg(test)]
mod tests {
    use eashop_core::{Category, Price, ProductId, Size, SizeId};

    use super::*;

    #[test]
    fn test_product_line() {
        let product = Product {
            product_id: ProductId::new(3),
            product_name: "Red Shirt".to_string(),
            product_description: String::new(),
            product_price: Price::from_cents(1250),
            product_image: String::new(),
            stock: 7,
            categories: vec![Category {
                category_id: CategoryId::new(1),
                category_name: "Shirts".to_string(),
            }],
            sizes: vec![
                Size {
                    size_id: SizeId::new(1),
                    size_label: "S".to_string(),
                },
                Size {
                    size_id: SizeId::new(2),
                    size_label: "M".to_string(),
                },
            ],
        };

        let line = product_line(&product);
        assert!(line.contains("Red Shirt"));
        assert!(line.contains("$12.50"));
        assert!(line.contains("stock 7"));
        assert!(line.ends_with("[Shirts] (S/M)"));
    }
}
