//! Client for the upstream Eashop REST API.
//!
//! # Architecture
//!
//! - Thin `reqwest` wrapper: GET/POST/PUT/DELETE against a fixed base URL
//! - No interceptors, retries, caching, or auth header injection
//! - Every list response is wrapped as `{ "data": { "<resource>": [...] } }`;
//!   see [`envelope`] for the unwrapping rules
//!
//! # Endpoints
//!
//! ```text
//! GET    /products
//! GET    /products/{id}
//! GET    /products/{id}/categories
//! GET    /products/{id}/sizes
//! GET    /categories
//! GET    /sizes
//! GET    /cart
//! POST   /cart
//! PUT    /cart/{userId}/{productId}/{sizeId}
//! DELETE /cart/{userId}/{productId}/{sizeId}
//! ```

mod client;
pub mod envelope;

pub use client::ApiClient;

use thiserror::Error;

/// Errors that can occur when talking to the upstream API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// Response body was not valid JSON or did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A list was expected but the payload held something else.
    #[error("{0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Malformed("Invalid products data format".to_string());
        assert_eq!(err.to_string(), "Invalid products data format");

        let err = ApiError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
    }
}
