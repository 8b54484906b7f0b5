//! Cart commands for the configured user.

use eashop_core::{CartItem, CartLineKey, Price, ProductId, SizeId};
use eashop_storefront::models::CartView;
use eashop_storefront::services::CartService;

use super::{CommandError, connect};

fn service() -> Result<CartService, CommandError> {
    let (api, config) = connect()?;
    Ok(CartService::new(api, config.cart_user_id))
}

/// Print the cart rows and the cart total.
#[allow(clippy::print_stdout)]
pub async fn show() -> Result<(), CommandError> {
    let cart = service()?;
    let items = cart.get_cart().await.ok_or(CommandError::CartUnavailable)?;

    if items.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }
    for item in &items {
        println!("{}", cart_line(item));
    }
    let total: Price = items.iter().map(CartItem::line_total).sum();
    println!("{} items, total {total}", cart.cart_item_count());
    Ok(())
}

/// Set the quantity of one cart row.
pub async fn set_quantity(product: i32, size: i32, quantity: u32) -> Result<(), CommandError> {
    if quantity == 0 {
        return Err(CommandError::InvalidQuantity);
    }

    let cart = service()?;
    let item = find_line(&cart, product, size).await?;
    cart.edit_cart(item.user_id, item.product_id, item.size_id, quantity)
        .await;

    tracing::info!(
        "Quantity set to {quantity}; cart now holds {} items",
        cart.cart_item_count()
    );
    Ok(())
}

/// Remove one cart row.
pub async fn remove(product: i32, size: i32) -> Result<(), CommandError> {
    let cart = service()?;
    let item = find_line(&cart, product, size).await?;
    cart.delete_item_from_cart(item.user_id, item.product_id, item.size_id)
        .await;

    tracing::info!(
        "Row removed; cart now holds {} items",
        cart.cart_item_count()
    );
    Ok(())
}

async fn find_line(cart: &CartService, product: i32, size: i32) -> Result<CartItem, CommandError> {
    let items = cart.get_cart().await.ok_or(CommandError::CartUnavailable)?;
    let key = CartLineKey::new(ProductId::new(product), SizeId::new(size));

    CartView::new(items)
        .item(key)
        .cloned()
        .ok_or(CommandError::LineNotFound { product, size })
}

fn cart_line(item: &CartItem) -> String {
    format!(
        "{:>5}  {:<30} {:<6} {:>3} x {:>10} = {:>10}",
        item.product_id,
        item.product_name,
        item.size_label,
        item.quantity,
        item.product_price.to_string(),
        item.line_total().to_string(),
    )
}
