//! Unwrapping of the `{ "data": { "<resource>": ... } }` response envelope.
//!
//! Three list policies exist because callers treat a wrong-shaped list
//! differently:
//!
//! - [`required_list`]: anything but an array is [`ApiError::Malformed`]
//! - [`optional_list`]: missing or `null` is an empty list, other non-arrays
//!   are [`ApiError::Malformed`]
//! - [`list_or_empty`]: anything but an array is logged and read as empty

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;

/// Resource key for product payloads.
pub const PRODUCT: &str = "product";
/// Resource key for category payloads.
pub const CATEGORIES: &str = "categories";
/// Resource key for size payloads.
pub const SIZES: &str = "sizes";
/// Resource key for cart payloads.
pub const CARTS: &str = "carts";

/// Take `body.data.<key>` out of a response, if present.
#[must_use]
pub fn take_resource(mut body: Value, key: &str) -> Option<Value> {
    body.get_mut("data")
        .and_then(|data| data.get_mut(key))
        .map(Value::take)
}

/// Decode `data.<key>` as a single record.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] if the resource is missing or `null`, and
/// [`ApiError::Parse`] if it does not match `T`.
pub fn required_item<T: DeserializeOwned>(body: Value, key: &str) -> Result<T, ApiError> {
    match take_resource(body, key) {
        None | Some(Value::Null) => Err(ApiError::Malformed(format!(
            "Response does not contain {key}"
        ))),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

/// Decode `data.<key>` as a list that must be present.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] with `message` when the resource is not
/// an array, and [`ApiError::Parse`] if an element does not match `T`.
pub fn required_list<T: DeserializeOwned>(
    body: Value,
    key: &str,
    message: &str,
) -> Result<Vec<T>, ApiError> {
    match take_resource(body, key) {
        Some(value @ Value::Array(_)) => Ok(serde_json::from_value(value)?),
        other => {
            tracing::error!(
                resource = key,
                payload = ?other,
                "API response does not contain an array"
            );
            Err(ApiError::Malformed(message.to_string()))
        }
    }
}

/// Decode `data.<key>` as a list that may be absent.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] when the resource is present but neither
/// `null` nor an array.
pub fn optional_list<T: DeserializeOwned>(body: Value, key: &str) -> Result<Vec<T>, ApiError> {
    match take_resource(body, key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value @ Value::Array(_)) => Ok(serde_json::from_value(value)?),
        Some(_) => Err(ApiError::Malformed(format!(
            "Invalid {key} data format"
        ))),
    }
}

/// Decode `data.<key>` as a list, reading any non-array as empty.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] if an element of an array does not match `T`.
pub fn list_or_empty<T: DeserializeOwned>(body: Value, key: &str) -> Result<Vec<T>, ApiError> {
    match take_resource(body, key) {
        Some(value @ Value::Array(_)) => Ok(serde_json::from_value(value)?),
        other => {
            tracing::warn!(
                resource = key,
                payload = ?other,
                "API did not return an array, using an empty list"
            );
            Ok(Vec::new())
        }
    }
}
