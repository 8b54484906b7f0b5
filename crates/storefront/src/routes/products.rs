//! Product catalog route handlers.
//!
//! The catalog page renders the filtered product grid, the category list, and
//! (when `?product=` is set) the product popup. The search box re-requests
//! only the grid fragment on every keystroke.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use eashop_core::{Category, CategoryId, NewCartItem, Product, ProductId, SizeId};
use serde::Deserialize;
use tracing::instrument;

use super::cart::CartCountTemplate;
use super::empty_string_as_none;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::models::catalog_view::{CARD_DESCRIPTION_CHARS, CARD_NAME_CHARS, truncate};
use crate::models::{CatalogFilter, CatalogState};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product card data for the grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    /// Link that opens this product's popup, keeping the current filters.
    pub href: String,
}

/// One entry in the category list.
#[derive(Clone)]
pub struct CategoryChip {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// A selectable size in the popup.
#[derive(Clone)]
pub struct SizeOption {
    pub id: i32,
    pub label: String,
    pub checked: bool,
}

/// Another product shown at the bottom of the popup.
#[derive(Clone)]
pub struct GalleryItem {
    pub name: String,
    pub image: String,
    pub href: String,
}

/// The product popup.
#[derive(Clone)]
pub struct PopupView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub stock: u32,
    pub sizes: Vec<SizeOption>,
    pub can_add: bool,
    pub close_href: String,
    pub gallery: Vec<GalleryItem>,
}

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub q: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product: Option<ProductId>,
}

impl CatalogQuery {
    fn filter(&self) -> CatalogFilter {
        CatalogFilter::new(self.category, self.q.clone())
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size_id: Option<SizeId>,
    #[serde(default)]
    pub quantity: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub error: Option<String>,
    pub categories: Vec<CategoryChip>,
    pub search: String,
    pub category_param: String,
    pub products: Vec<ProductCardView>,
    pub popup: Option<PopupView>,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub error: Option<String>,
    pub products: Vec<ProductCardView>,
}

/// Add-to-cart rejection fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_error.html")]
pub struct AddErrorTemplate {
    pub message: String,
}

// =============================================================================
// Link Building
// =============================================================================

/// Build a catalog URL, omitting empty parameters.
#[must_use]
pub fn catalog_href(
    category: Option<CategoryId>,
    search: &str,
    product: Option<ProductId>,
) -> String {
    let mut params = Vec::new();
    if let Some(category) = category {
        params.push(format!("category={category}"));
    }
    if !search.is_empty() {
        params.push(format!("q={}", urlencoding::encode(search)));
    }
    if let Some(product) = product {
        params.push(format!("product={product}"));
    }

    if params.is_empty() {
        "/products".to_string()
    } else {
        format!("/products?{}", params.join("&"))
    }
}

fn product_card(product: &Product, query: &CatalogQuery) -> ProductCardView {
    ProductCardView {
        id: product.product_id.as_i32(),
        name: truncate(&product.product_name, CARD_NAME_CHARS),
        description: truncate(&product.product_description, CARD_DESCRIPTION_CHARS),
        price: product.product_price.to_string(),
        image: product.product_image.clone(),
        href: catalog_href(query.category, &query.q, Some(product.product_id)),
    }
}

fn category_chips(categories: &[Category], query: &CatalogQuery) -> Vec<CategoryChip> {
    let all = CategoryChip {
        label: "All Products".to_string(),
        href: catalog_href(None, &query.q, None),
        active: query.category.is_none(),
    };

    std::iter::once(all)
        .chain(categories.iter().map(|category| CategoryChip {
            label: category.category_name.clone(),
            href: catalog_href(Some(category.category_id), &query.q, None),
            active: query.category == Some(category.category_id),
        }))
        .collect()
}

fn popup_view(product: &Product, filtered: &[&Product], query: &CatalogQuery) -> PopupView {
    let default_size = product.default_size().map(|size| size.size_id);

    PopupView {
        id: product.product_id.as_i32(),
        name: product.product_name.clone(),
        description: product.product_description.clone(),
        price: product.product_price.to_string(),
        image: product.product_image.clone(),
        stock: product.stock,
        sizes: product
            .sizes
            .iter()
            .map(|size| SizeOption {
                id: size.size_id.as_i32(),
                label: size.size_label.clone(),
                checked: Some(size.size_id) == default_size,
            })
            .collect(),
        can_add: default_size.is_some() && product.stock > 0,
        close_href: catalog_href(query.category, &query.q, None),
        gallery: filtered
            .iter()
            .filter(|other| other.product_id != product.product_id)
            .map(|other| GalleryItem {
                name: other.product_name.clone(),
                image: other.product_image.clone(),
                href: catalog_href(query.category, &query.q, Some(other.product_id)),
            })
            .collect(),
    }
}

fn status_for(catalog: &CatalogState) -> StatusCode {
    if catalog.error().is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    }
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the catalog page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<CatalogQuery>) -> Response {
    let (products, categories) = tokio::join!(
        state.catalog().get_all_products(),
        state.catalog().get_all_product_category(),
    );

    let catalog = CatalogState::from_result(products);
    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories");
        Vec::new()
    });

    let filtered = query.filter().apply(catalog.products());
    let popup = query.product.and_then(|product_id| {
        catalog
            .products()
            .iter()
            .find(|product| product.product_id == product_id)
            .map(|product| popup_view(product, &filtered, &query))
    });

    let template = ProductsIndexTemplate {
        error: catalog.error().map(str::to_string),
        categories: category_chips(&categories, &query),
        search: query.q.clone(),
        category_param: query.category.map(|c| c.to_string()).unwrap_or_default(),
        products: filtered.iter().map(|p| product_card(p, &query)).collect(),
        popup,
    };

    (status_for(&catalog), template).into_response()
}

/// Display the filtered product grid (HTMX fragment).
#[instrument(skip(state))]
pub async fn grid(State(state): State<AppState>, Query(query): Query<CatalogQuery>) -> Response {
    let catalog = CatalogState::from_result(state.catalog().get_all_products().await);
    let filtered = query.filter().apply(catalog.products());

    let template = ProductGridTemplate {
        error: catalog.error().map(str::to_string),
        products: filtered.iter().map(|p| product_card(p, &query)).collect(),
    };

    (status_for(&catalog), template).into_response()
}

/// Add a product to the cart (HTMX).
///
/// The quantity is checked against the product's current stock and the size
/// against its current sizes. Returns the cart count badge with an HTMX
/// trigger so other cart widgets refresh.
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let catalog = state.catalog();
    let (product, sizes) = tokio::try_join!(
        catalog.get_product(form.product_id),
        catalog.get_product_sizes(form.product_id),
    )?;
    let product = Product { sizes, ..product };

    let Some(size_id) = form
        .size_id
        .or_else(|| product.default_size().map(|size| size.size_id))
    else {
        return Ok(rejection("This product has no sizes available"));
    };
    if !product.has_size(size_id) {
        return Ok(rejection("Please select a valid size"));
    }

    let quantity = form.quantity.trim().parse::<u32>().unwrap_or(0);
    if !product.accepts_quantity(quantity) {
        let message = if product.stock == 0 {
            "This product is out of stock".to_string()
        } else {
            format!("Quantity must be between 1 and {}", product.stock)
        };
        return Ok(rejection(&message));
    }

    let cart = state.cart();
    cart.insert_product_to_cart(&NewCartItem {
        user_id: cart.user_id(),
        product_id: product.product_id,
        size_id,
        quantity,
    })
    .await;

    let product_id = product.product_id.to_string();
    let quantity_str = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added product to cart",
        Some(&[
            ("product_id", product_id.as_str()),
            ("quantity", quantity_str.as_str()),
        ]),
    );

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.cart_item_count(),
        },
    )
        .into_response())
}

/// A 400 response that HTMX swaps into the popup's message slot instead of
/// the cart badge.
fn rejection(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        AppendHeaders([("HX-Retarget", "#add-result"), ("HX-Reswap", "innerHTML")]),
        AddErrorTemplate {
            message: message.to_string(),
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eashop_core::{Price, Size};

    use super::*;

    fn product(id: i32, name: &str, sizes: &[(i32, &str)], stock: u32) -> Product {
        Product {
            product_id: ProductId::new(id),
            product_name: name.to_string(),
            product_description: "A fine product for everyday wear and tear".to_string(),
            product_price: Price::from_cents(1999),
            product_image: format!("/img/{id}.jpg"),
            stock,
            categories: Vec::new(),
            sizes: sizes
                .iter()
                .map(|&(size_id, label)| Size {
                    size_id: SizeId::new(size_id),
                    size_label: label.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_catalog_href() {
        assert_eq!(catalog_href(None, "", None), "/products");
        assert_eq!(
            catalog_href(Some(CategoryId::new(2)), "", None),
            "/products?category=2"
        );
        assert_eq!(
            catalog_href(Some(CategoryId::new(2)), "red cap", Some(ProductId::new(5))),
            "/products?category=2&q=red%20cap&product=5"
        );
        assert_eq!(catalog_href(None, "a&b", None), "/products?q=a%26b");
    }

    #[test]
    fn test_query_treats_empty_params_as_absent() {
        let query = parse_query("category=&q=shirt&product=");
        assert_eq!(query.category, None);
        assert_eq!(query.product, None);
        assert_eq!(query.q, "shirt");

        let query = parse_query("category=3&product=7");
        assert_eq!(query.category, Some(CategoryId::new(3)));
        assert_eq!(query.product, Some(ProductId::new(7)));
    }

    fn parse_query(raw: &str) -> CatalogQuery {
        let uri: axum::http::Uri = format!("/products?{raw}").parse().unwrap();
        Query::<CatalogQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_product_card_truncates() {
        let product = product(1, "An extraordinarily long shirt name", &[], 3);
        let card = product_card(&product, &CatalogQuery::default());

        assert_eq!(card.name, "An extraordinarily l...");
        assert_eq!(card.description, "A fine product for everyday wear and tear");
        assert_eq!(card.price, "$19.99");
        assert_eq!(card.href, "/products?product=1");
    }

    #[test]
    fn test_category_chips_mark_active() {
        let categories = vec![
            Category {
                category_id: CategoryId::new(1),
                category_name: "Shirts".to_string(),
            },
            Category {
                category_id: CategoryId::new(2),
                category_name: "Hats".to_string(),
            },
        ];
        let query = CatalogQuery {
            category: Some(CategoryId::new(2)),
            ..CatalogQuery::default()
        };

        let chips = category_chips(&categories, &query);
        let labels: Vec<_> = chips.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["All Products", "Shirts", "Hats"]);
        let active: Vec<_> = chips.iter().map(|c| c.active).collect();
        assert_eq!(active, vec![false, false, true]);
    }

    #[test]
    fn test_popup_defaults_to_first_size_and_excludes_itself() {
        let shirt = product(1, "Shirt", &[(4, "M"), (5, "L")], 3);
        let hat = product(2, "Hat", &[], 0);
        let filtered = vec![&shirt, &hat];

        let view = popup_view(&shirt, &filtered, &CatalogQuery::default());
        assert!(view.can_add);
        assert_eq!(view.sizes.len(), 2);
        assert!(view.sizes.first().unwrap().checked);
        assert!(!view.sizes.last().unwrap().checked);
        assert_eq!(view.gallery.len(), 1);
        assert_eq!(view.gallery.first().unwrap().href, "/products?product=2");
        assert_eq!(view.close_href, "/products");

        let view = popup_view(&hat, &filtered, &CatalogQuery::default());
        assert!(!view.can_add);
        assert!(view.sizes.is_empty());
    }

    #[test]
    fn test_grid_template_renders_error() {
        let html = ProductGridTemplate {
            error: Some("Failed to load products".to_string()),
            products: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Error: Failed to load products"));
    }

    #[test]
    fn test_grid_template_renders_cards() {
        let product = product(9, "Linen Shirt", &[], 2);
        let html = ProductGridTemplate {
            error: None,
            products: vec![product_card(&product, &CatalogQuery::default())],
        }
        .render()
        .unwrap();
        assert!(html.contains("Linen Shirt"));
        assert!(html.contains("$19.99"));
        assert!(html.contains("/products?product=9"));
    }
}
