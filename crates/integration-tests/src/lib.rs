//! Integration test harness for the Eashop storefront.
//!
//! [`FakeApi`] serves an in-memory stand-in for the Eashop REST API on an
//! ephemeral port. It answers the catalog and cart endpoints from
//! [`FakeData`], applies cart writes, and records every request so tests can
//! assert on the traffic the storefront produced.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p eashop-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use eashop_storefront::config::{ApiConfig, ConfigError, StorefrontConfig};
use serde_json::{Value, json};

/// Path prefix the fake API is mounted under.
pub const API_PREFIX: &str = "/api";

/// One request received by the fake API.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to the API base URL.
    pub path: String,
    pub body: Option<Value>,
}

/// Data served by the fake API.
///
/// `products` is served verbatim as `data.product` of `GET /products`, so a
/// test can make it any JSON shape. Per-product categories and sizes default
/// to a missing resource when no entry is present.
#[derive(Debug, Clone)]
pub struct FakeData {
    pub products: Value,
    pub product_categories: Vec<(i32, Value)>,
    pub product_sizes: Vec<(i32, Value)>,
    pub categories: Value,
    pub sizes: Value,
    pub carts: Vec<Value>,
    /// When set, every cart write answers 500 without changing anything.
    pub fail_cart_writes: bool,
}

impl FakeData {
    /// A small catalog: two shirts, a cap, and a cart shared by two users.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            products: json!([
                product(1, "Red Shirt", "19.99", 5),
                product(2, "Blue Jeans", "45.00", 2),
                product(3, "Red Cap", "12.50", 0),
            ]),
            product_categories: vec![
                (1, json!([category(1, "Shirts")])),
                (2, json!([category(2, "Trousers")])),
                (3, json!([category(1, "Shirts"), category(3, "Hats")])),
            ],
            product_sizes: vec![
                (1, json!([size(1, "S"), size(2, "M")])),
                (2, json!([size(2, "M")])),
                (3, Value::Null),
            ],
            categories: json!([
                category(1, "Shirts"),
                category(2, "Trousers"),
                category(3, "Hats"),
            ]),
            sizes: json!([size(1, "S"), size(2, "M")]),
            carts: vec![
                cart_row(1, 1, 1, 2, "Red Shirt", "19.99", "S"),
                cart_row(1, 1, 2, 1, "Red Shirt", "19.99", "M"),
                cart_row(2, 2, 2, 4, "Blue Jeans", "45.00", "M"),
            ],
            fail_cart_writes: false,
        }
    }
}

/// A product record as the API returns it.
#[must_use]
pub fn product(id: i32, name: &str, price: &str, stock: u32) -> Value {
    json!({
        "product_id": id,
        "product_name": name,
        "product_description": format!("{name} description"),
        "product_price": price,
        "product_image": format!("/images/{id}.jpg"),
        "stock": stock,
    })
}

/// A category record.
#[must_use]
pub fn category(id: i32, name: &str) -> Value {
    json!({ "category_id": id, "category_name": name })
}

/// A size record.
#[must_use]
pub fn size(id: i32, label: &str) -> Value {
    json!({ "size_id": id, "size_label": label })
}

/// A cart row record.
#[must_use]
pub fn cart_row(
    user_id: i32,
    product_id: i32,
    size_id: i32,
    quantity: u32,
    name: &str,
    price: &str,
    size_label: &str,
) -> Value {
    json!({
        "user_id": user_id,
        "product_id": product_id,
        "size_id": size_id,
        "quantity": quantity,
        "product_price": price,
        "product_name": name,
        "product_image": format!("/images/{product_id}.jpg"),
        "size_label": size_label,
    })
}

#[derive(Clone)]
struct FakeState {
    data: Arc<Mutex<FakeData>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A running fake API server.
pub struct FakeApi {
    addr: SocketAddr,
    state: FakeState,
}

impl FakeApi {
    /// Serve `data` on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(data: FakeData) -> Self {
        let state = FakeState {
            data: Arc::new(Mutex::new(data)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("Failed to read fake API address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL to configure the storefront with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// API settings pointing at this server, cart user 1.
    ///
    /// # Errors
    ///
    /// Never fails for the URLs this server produces.
    pub fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        ApiConfig::with_base_url(&self.base_url())
    }

    /// Storefront settings pointing at this server.
    ///
    /// # Errors
    ///
    /// Never fails for the URLs this server produces.
    pub fn storefront_config(&self) -> Result<StorefrontConfig, ConfigError> {
        Ok(StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://localhost".to_string(),
            api: self.api_config()?,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        })
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Requests received for one method and path.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| &r.method == method && r.path == path)
            .collect()
    }

    /// Forget recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.state.requests).clear();
    }

    /// Current cart rows, for every user.
    #[must_use]
    pub fn carts(&self) -> Vec<Value> {
        lock(&self.state.data).carts.clone()
    }

    /// Change the served data in place.
    pub fn update(&self, f: impl FnOnce(&mut FakeData)) {
        f(&mut lock(&self.state.data));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn envelope(key: &str, value: Value) -> Response {
    let mut resource = serde_json::Map::new();
    resource.insert(key.to_string(), value);
    Json(json!({ "data": resource })).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response()
}

impl FakeData {
    /// Expand a posted `{user_id, product_id, size_id, quantity}` into a full
    /// cart row using the served product and size records.
    fn cart_row_for(&self, posted: &Value) -> Option<Value> {
        let int = |name: &str| {
            posted
                .get(name)
                .and_then(Value::as_i64)
                .and_then(|v| i32::try_from(v).ok())
        };
        let (user, product_id, size_id) = (int("user_id")?, int("product_id")?, int("size_id")?);
        let quantity = posted
            .get("quantity")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())?;

        let product = self.products.as_array()?.iter().find(|p| {
            p.get("product_id").and_then(Value::as_i64) == Some(i64::from(product_id))
        })?;
        let size_label = lookup(&self.product_sizes, product_id)
            .and_then(|sizes| {
                sizes.as_array().and_then(|sizes| {
                    sizes
                        .iter()
                        .find(|s| s.get("size_id").and_then(Value::as_i64) == Some(i64::from(size_id)))
                        .and_then(|s| s.get("size_label"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
            })
            .unwrap_or_default();

        Some(cart_row(
            user,
            product_id,
            size_id,
            quantity,
            product.get("product_name").and_then(Value::as_str).unwrap_or_default(),
            product.get("product_price").and_then(Value::as_str).unwrap_or("0"),
            &size_label,
        ))
    }
}

fn lookup(entries: &[(i32, Value)], id: i32) -> Option<Value> {
    entries
        .iter()
        .find(|(entry_id, _)| *entry_id == id)
        .map(|(_, value)| value.clone())
}

fn same_line(row: &Value, user: i32, product: i32, size: i32) -> bool {
    let field = |name: &str| row.get(name).and_then(Value::as_i64);
    field("user_id") == Some(i64::from(user))
        && field("product_id") == Some(i64::from(product))
        && field("size_id") == Some(i64::from(size))
}

async fn handle(State(state): State<FakeState>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_string();
    let body: Option<Value> = serde_json::from_slice(&body).ok();

    lock(&state.requests).push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body: body.clone(),
    });

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let ids: Vec<i32> = segments.iter().filter_map(|s| s.parse().ok()).collect();
    let mut data = lock(&state.data);

    match (method, segments.as_slice()) {
        (Method::GET, ["products"]) => envelope("product", data.products.clone()),
        (Method::GET, ["products", _]) => {
            let found = ids.first().and_then(|&id| {
                data.products.as_array().and_then(|products| {
                    products
                        .iter()
                        .find(|p| p.get("product_id").and_then(Value::as_i64) == Some(i64::from(id)))
                        .cloned()
                })
            });
            found.map_or_else(not_found, |p| envelope("product", p))
        }
        (Method::GET, ["products", _, "categories"]) => match ids.first() {
            Some(&id) => lookup(&data.product_categories, id)
                .map_or_else(|| Json(json!({ "data": {} })).into_response(), |v| {
                    envelope("categories", v)
                }),
            None => not_found(),
        },
        (Method::GET, ["products", _, "sizes"]) => match ids.first() {
            Some(&id) => lookup(&data.product_sizes, id)
                .map_or_else(|| Json(json!({ "data": {} })).into_response(), |v| {
                    envelope("sizes", v)
                }),
            None => not_found(),
        },
        (Method::GET, ["categories"]) => envelope("categories", data.categories.clone()),
        (Method::GET, ["sizes"]) => envelope("sizes", data.sizes.clone()),
        (Method::GET, ["cart"]) => envelope("carts", Value::Array(data.carts.clone())),
        (_, ["cart", ..]) if data.fail_cart_writes => {
            (StatusCode::INTERNAL_SERVER_ERROR, "cart unavailable").into_response()
        }
        (Method::POST, ["cart"]) => match body.as_ref().and_then(|b| data.cart_row_for(b)) {
            Some(row) => {
                data.carts.push(row);
                (StatusCode::CREATED, Json(json!({ "message": "Added to cart" }))).into_response()
            }
            None => StatusCode::BAD_REQUEST.into_response(),
        },
        (Method::PUT, ["cart", _, _, _]) => {
            let [user, product, size] = ids.as_slice() else {
                return not_found();
            };
            let quantity = body
                .as_ref()
                .and_then(|b| b.get("quantity"))
                .cloned()
                .unwrap_or(Value::Null);
            match data
                .carts
                .iter_mut()
                .find(|row| same_line(row, *user, *product, *size))
            {
                Some(row) => {
                    if let Some(fields) = row.as_object_mut() {
                        fields.insert("quantity".to_string(), quantity);
                    }
                    Json(json!({ "message": "Cart updated" })).into_response()
                }
                None => not_found(),
            }
        }
        (Method::DELETE, ["cart", _, _, _]) => {
            let [user, product, size] = ids.as_slice() else {
                return not_found();
            };
            let before = data.carts.len();
            data.carts
                .retain(|row| !same_line(row, *user, *product, *size));
            if data.carts.len() == before {
                not_found()
            } else {
                StatusCode::NO_CONTENT.into_response()
            }
        }
        _ => not_found(),
    }
}
