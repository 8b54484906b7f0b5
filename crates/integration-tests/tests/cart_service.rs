//! Cart service against the fake API: user filtering and re-fetch after writes.

#![allow(clippy::unwrap_used)]

use axum::http::Method;
use eashop_core::{NewCartItem, ProductId, SizeId, UserId};
use eashop_integration_tests::{FakeApi, FakeData};
use eashop_storefront::api::ApiClient;
use eashop_storefront::services::CartService;
use serde_json::json;

fn cart(api: &FakeApi) -> CartService {
    let config = api.api_config().unwrap();
    CartService::new(ApiClient::new(&config), config.cart_user_id)
}

#[tokio::test]
async fn test_get_cart_keeps_only_configured_user() {
    let api = FakeApi::start(FakeData::sample()).await;
    let cart = cart(&api);

    let items = cart.get_cart().await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.user_id == UserId::new(1)));
    assert_eq!(cart.cart_item_count(), 3);
}

#[tokio::test]
async fn test_edit_cart_sends_quantity_and_refetches() {
    let api = FakeApi::start(FakeData::sample()).await;
    let cart = cart(&api);

    cart.edit_cart(UserId::new(1), ProductId::new(1), SizeId::new(1), 5)
        .await;

    let puts = api.requests_to(&Method::PUT, "/cart/1/1/1");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts.first().unwrap().body, Some(json!({ "quantity": 5 })));
    assert_eq!(api.requests_to(&Method::GET, "/cart").len(), 1);
    assert_eq!(cart.cart_item_count(), 6);
}

#[tokio::test]
async fn test_delete_removes_only_that_size() {
    let api = FakeApi::start(FakeData::sample()).await;
    let cart = cart(&api);

    cart.delete_item_from_cart(UserId::new(1), ProductId::new(1), SizeId::new(1))
        .await;

    let items = cart.get_cart().await.unwrap();
    assert_eq!(items.len(), 1);
    let remaining = items.first().unwrap();
    assert_eq!(remaining.size_id, SizeId::new(2));
    assert_eq!(remaining.quantity, 1);
}

#[tokio::test]
async fn test_insert_product_posts_and_refetches() {
    let api = FakeApi::start(FakeData::sample()).await;
    let cart = cart(&api);

    cart.insert_product_to_cart(&NewCartItem {
        user_id: UserId::new(1),
        product_id: ProductId::new(2),
        size_id: SizeId::new(2),
        quantity: 2,
    })
    .await;

    let posts = api.requests_to(&Method::POST, "/cart");
    assert_eq!(
        posts.first().unwrap().body,
        Some(json!({ "user_id": 1, "product_id": 2, "size_id": 2, "quantity": 2 }))
    );
    assert_eq!(cart.cart_item_count(), 5);
}

#[tokio::test]
async fn test_failed_write_still_refetches_and_is_swallowed() {
    let mut data = FakeData::sample();
    data.fail_cart_writes = true;
    let api = FakeApi::start(data).await;
    let cart = cart(&api);

    cart.delete_item_from_cart(UserId::new(1), ProductId::new(1), SizeId::new(1))
        .await;

    assert_eq!(api.requests_to(&Method::GET, "/cart").len(), 1);
    assert_eq!(api.carts().len(), 3);
    assert_eq!(cart.cart_item_count(), 3);
}

#[tokio::test]
async fn test_get_cart_returns_none_when_unreachable() {
    let api = FakeApi::start(FakeData::sample()).await;
    let config = api.api_config().unwrap();
    // Nothing listens on port 9 (discard) locally
    let unreachable =
        eashop_storefront::config::ApiConfig::with_base_url("http://127.0.0.1:9/api").unwrap();
    let cart = CartService::new(ApiClient::new(&unreachable), config.cart_user_id);

    assert!(cart.get_cart().await.is_none());
    assert_eq!(cart.cart_item_count(), 0);
}
