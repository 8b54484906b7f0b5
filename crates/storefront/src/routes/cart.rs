//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The page load fetches the cart into the visitor's session; every later
//! interaction mutates that local copy, fires the matching upstream call, and
//! renders the local copy whatever the call's outcome.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use eashop_core::{CartItem, CartLineKey, ProductId, SizeId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::models::{CartView, session_keys};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart row display data for templates.
#[derive(Clone)]
pub struct CartRowView {
    pub product_id: i32,
    pub size_id: i32,
    pub name: String,
    pub image: String,
    pub size_label: String,
    pub price: String,
    pub line_price: String,
    pub quantity: u32,
    pub selected: bool,
}

impl From<&CartItem> for CartRowView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.as_i32(),
            size_id: item.size_id.as_i32(),
            name: item.product_name.clone(),
            image: item.product_image.clone(),
            size_label: item.size_label.clone(),
            price: item.product_price.to_string(),
            line_price: item.line_total().to_string(),
            quantity: item.quantity,
            selected: item.selected,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartPageView {
    pub rows: Vec<CartRowView>,
    pub all_selected: bool,
    pub subtotal: String,
    pub checkout_enabled: bool,
}

impl From<&CartView> for CartPageView {
    fn from(cart: &CartView) -> Self {
        Self {
            rows: cart.items().iter().map(CartRowView::from).collect(),
            all_selected: cart.all_selected(),
            subtotal: cart.subtotal().to_string(),
            checkout_enabled: cart.checkout_enabled(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Identifies one cart row.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub product_id: ProductId,
    pub size_id: SizeId,
}

impl LineForm {
    const fn key(&self) -> CartLineKey {
        CartLineKey::new(self.product_id, self.size_id)
    }
}

/// Quantity change requested from the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityAction {
    Decrease,
    Increase,
    Set,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub size_id: SizeId,
    pub action: QuantityAction,
    #[serde(default)]
    pub quantity: String,
}

/// Select-all form data. The checkbox is only submitted when checked.
#[derive(Debug, Deserialize)]
pub struct SelectAllForm {
    #[serde(default)]
    pub checked: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartPageView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartPageView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's local cart, or an empty one.
async fn load_cart_view(session: &Session) -> CartView {
    match session.get::<CartView>(session_keys::CART_VIEW).await {
        Ok(view) => view.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart view from session");
            CartView::default()
        }
    }
}

/// Persist the visitor's local cart.
async fn save_cart_view(session: &Session, view: &CartView) -> Result<(), AppError> {
    session.insert(session_keys::CART_VIEW, view).await?;
    Ok(())
}

/// Render the cart items fragment and tell the page the cart changed.
fn items_fragment(view: &CartView) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartPageView::from(view),
        },
    )
        .into_response()
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display cart page.
///
/// Fetches the cart afresh; if the fetch fails the previous local copy is
/// shown.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<CartShowTemplate, AppError> {
    let view = match state.cart().get_cart().await {
        Some(items) => CartView::new(items),
        None => load_cart_view(&session).await,
    };
    save_cart_view(&session, &view).await?;

    Ok(CartShowTemplate {
        cart: CartPageView::from(&view),
    })
}

/// Change a row's quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, AppError> {
    let key = CartLineKey::new(form.product_id, form.size_id);
    let mut view = load_cart_view(&session).await;

    let quantity = match form.action {
        QuantityAction::Decrease => view.decrease_quantity(key),
        QuantityAction::Increase => view.increase_quantity(key),
        QuantityAction::Set => view.set_quantity(key, &form.quantity),
    }
    .ok_or_else(|| AppError::NotFound("cart line".to_string()))?;

    save_cart_view(&session, &view).await?;

    let user_id = view
        .item(key)
        .map_or_else(|| state.cart().user_id(), |item| item.user_id);
    state
        .cart()
        .edit_cart(user_id, key.product_id, key.size_id, quantity)
        .await;

    Ok(items_fragment(&view))
}

/// Toggle one row's selection (HTMX).
#[instrument(skip(session))]
pub async fn select(session: Session, Form(form): Form<LineForm>) -> Result<Response, AppError> {
    let mut view = load_cart_view(&session).await;
    view.toggle_selection(form.key())
        .ok_or_else(|| AppError::NotFound("cart line".to_string()))?;
    save_cart_view(&session, &view).await?;

    Ok(CartItemsTemplate {
        cart: CartPageView::from(&view),
    }
    .into_response())
}

/// Select or deselect every row (HTMX).
#[instrument(skip(session))]
pub async fn select_all(
    session: Session,
    Form(form): Form<SelectAllForm>,
) -> Result<Response, AppError> {
    let mut view = load_cart_view(&session).await;
    view.select_all(form.checked.is_some());
    save_cart_view(&session, &view).await?;

    Ok(CartItemsTemplate {
        cart: CartPageView::from(&view),
    }
    .into_response())
}

/// Remove a row (HTMX).
///
/// Only the row matching both product and size is removed.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LineForm>,
) -> Result<Response, AppError> {
    let key = form.key();
    let mut view = load_cart_view(&session).await;

    let user_id = view
        .item(key)
        .map_or_else(|| state.cart().user_id(), |item| item.user_id);

    if view.remove(key) {
        save_cart_view(&session, &view).await?;
        state
            .cart()
            .delete_item_from_cart(user_id, key.product_id, key.size_id)
            .await;

        let product_id = key.product_id.to_string();
        let size_id = key.size_id.to_string();
        add_breadcrumb(
            "cart",
            "Removed cart line",
            Some(&[
                ("product_id", product_id.as_str()),
                ("size_id", size_id.as_str()),
            ]),
        );
    }

    Ok(items_fragment(&view))
}

/// Get cart count badge (HTMX fragment).
///
/// Refreshes the cart first so the badge reflects upstream state.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    state.cart().get_cart().await;
    CartCountTemplate {
        count: state.cart().cart_item_count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eashop_core::{Price, UserId};

    use super::*;

    fn item(product: i32, size: i32, quantity: u32, selected: bool) -> CartItem {
        CartItem {
            user_id: UserId::new(1),
            product_id: ProductId::new(product),
            size_id: SizeId::new(size),
            quantity,
            selected,
            product_price: Price::from_cents(1500),
            product_name: format!("Product {product}"),
            product_image: String::new(),
            size_label: "M".to_string(),
        }
    }

    #[test]
    fn test_quantity_action_deserializes_lowercase() {
        let form: UpdateCartForm =
            serde_json::from_str(r#"{"product_id":1,"size_id":2,"action":"increase"}"#).unwrap();
        assert_eq!(form.action, QuantityAction::Increase);
        assert!(form.quantity.is_empty());
    }

    #[test]
    fn test_page_view_from_cart() {
        let view = CartView::new(vec![item(1, 1, 2, true), item(2, 1, 1, false)]);
        let page = CartPageView::from(&view);

        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows.first().unwrap().line_price, "$30.00");
        assert_eq!(page.subtotal, "$30.00");
        assert!(page.checkout_enabled);
    }

    #[test]
    fn test_empty_cart_renders_message() {
        let html = CartItemsTemplate {
            cart: CartPageView::from(&CartView::default()),
        }
        .render()
        .unwrap();

        assert!(html.contains("Your cart is empty."));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn test_cart_items_render_rows() {
        let view = CartView::new(vec![item(7, 3, 4, false)]);
        let html = CartItemsTemplate {
            cart: CartPageView::from(&view),
        }
        .render()
        .unwrap();

        assert!(html.contains("Product 7"));
        assert!(html.contains("$15.00"));
        assert!(!html.contains("Your cart is empty."));
    }

    #[test]
    fn test_cart_count_renders() {
        let html = CartCountTemplate { count: 5 }.render().unwrap();
        assert!(html.contains('5'));
        assert!(html.contains("cart-count"));
    }
}
