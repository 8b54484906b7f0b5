//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to /products
//!
//! # Products
//! GET  /products               - Catalog page (?category, ?q, ?product)
//! GET  /products/grid          - Filtered product grid (HTMX)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Change quantity (returns cart_items fragment)
//! POST /cart/select            - Toggle row selection (returns cart_items fragment)
//! POST /cart/select-all        - Select/deselect all (returns cart_items fragment)
//! POST /cart/remove            - Remove row (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Profile
//! GET  /profile                - Credential status
//! POST /profile/credentials    - Store token and user id
//! POST /profile/logout         - Clear credentials
//! ```

pub mod cart;
pub mod products;
pub mod profile;

use std::fmt::Display;
use std::str::FromStr;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::{Deserialize, Deserializer};

use crate::state::AppState;

/// Deserialize an optional query or form value, treating an empty string as
/// absent.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/grid", get(products::grid))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(products::add_to_cart))
        .route("/update", post(cart::update))
        .route("/select", post(cart::select))
        .route("/select-all", post(cart::select_all))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show))
        .route("/credentials", post(profile::credentials))
        .route("/logout", post(profile::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // The catalog is the landing page
        .route("/", get(|| async { Redirect::to("/products") }))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/profile", profile_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eashop_core::CategoryId;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        category: Option<CategoryId>,
    }

    #[test]
    fn test_empty_string_as_none() {
        let params: Params = serde_json::from_str(r#"{"category":""}"#).unwrap();
        assert_eq!(params.category, None);

        let params: Params = serde_json::from_str(r#"{"category":" 4 "}"#).unwrap();
        assert_eq!(params.category, Some(CategoryId::new(4)));

        let params: Params = serde_json::from_str("{}").unwrap();
        assert_eq!(params.category, None);

        assert!(serde_json::from_str::<Params>(r#"{"category":"abc"}"#).is_err());
    }
}
