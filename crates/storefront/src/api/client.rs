//! `reqwest`-backed HTTP wrapper for the upstream API.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use super::ApiError;
use crate::config::ApiConfig;

/// How much of an unexpected body to keep for logs and errors.
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for the upstream REST API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Issue a `GET` and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a body
    /// that is not JSON.
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, self.request(Method::GET, path))
            .await
    }

    /// Issue a `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(
            Method::POST,
            path,
            self.request(Method::POST, path).json(body),
        )
        .await
    }

    /// Issue a `PUT` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, self.request(Method::PUT, path).json(body))
            .await
    }

    /// Issue a `DELETE`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::DELETE, path, self.request(Method::DELETE, path))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        self.inner
            .client
            .request(method, url)
            .header("Accept", "application/json")
    }

    #[instrument(skip(self, request))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&response_text),
                "Upstream API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: excerpt(&response_text),
            });
        }

        // Mutations may answer with an empty body
        if response_text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&response_text),
                "Failed to parse upstream API response"
            );
            ApiError::Parse(e)
        })
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "x".repeat(500);
        assert_eq!(excerpt(&body).len(), BODY_EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_base_url_from_config() {
        let config = ApiConfig::with_base_url("http://127.0.0.1:9000/api/").unwrap();
        let client = ApiClient::new(&config);
        assert_eq!(client.base_url(), "http://127.0.0.1:9000/api");
    }
}
