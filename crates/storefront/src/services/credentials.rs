//! Credential store: bearer token and user id kept for the visitor.
//!
//! Values are written through a [`CredentialBackend`]; in the running
//! storefront that is the visitor's cookie session. Clearing verifies that
//! both values are gone and retries a bounded number of times before giving
//! up.

use std::future::Future;

use axum::http::{HeaderMap, HeaderValue, header};
use eashop_core::Credential;
use tower_sessions::Session;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "auth_token";

/// Key holding the user id.
pub const USER_ID_KEY: &str = "user_id";

/// Retries after the first failed attempt to clear credentials.
pub const CLEAR_AUTH_RETRIES: u32 = 3;

/// Key/value storage the credential store writes through.
pub trait CredentialBackend: Send + Sync {
    /// Backend failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a stored value.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Store a value, replacing any previous one.
    fn write(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl CredentialBackend for Session {
    type Error = tower_sessions::session::Error;

    async fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.get::<String>(key).await
    }

    async fn write(&self, key: &str, value: String) -> Result<(), Self::Error> {
        self.insert(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), Self::Error> {
        Session::remove::<String>(self, key).await.map(|_| ())
    }
}

/// A stored credential together with the request headers it implies.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub credential: Credential,
    pub headers: HeaderMap,
}

/// Result of [`CredentialStore::clear_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Both values are gone; the caller should reload into the catalog.
    Cleared,
    /// Values were still present after every attempt; nothing more is done.
    GaveUp,
}

/// Reads and writes the visitor's credential.
pub struct CredentialStore<B> {
    backend: B,
}

impl<B: CredentialBackend> CredentialStore<B> {
    /// Create a store over a backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Store both the token and the user id.
    ///
    /// # Errors
    ///
    /// Returns the backend error if either write fails.
    pub async fn set_authorization(&self, token: &str, user_id: &str) -> Result<(), B::Error> {
        self.store_token(token).await?;
        self.store_user_id(user_id).await
    }

    /// Store the bearer token.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the write fails.
    pub async fn store_token(&self, token: &str) -> Result<(), B::Error> {
        self.backend.write(TOKEN_KEY, token.to_string()).await
    }

    /// Store the user id.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the write fails.
    pub async fn store_user_id(&self, user_id: &str) -> Result<(), B::Error> {
        self.backend.write(USER_ID_KEY, user_id.to_string()).await
    }

    /// The stored credential and its headers, if both values are present.
    ///
    /// Backend read errors are treated as absent values.
    pub async fn get_auth(&self) -> Option<AuthContext> {
        let token = self.get_token().await?;
        let user_id = self.get_user_id().await?;

        let credential = Credential::new(token, user_id);
        let headers = auth_headers(&credential)?;

        Some(AuthContext {
            credential,
            headers,
        })
    }

    /// The stored bearer token.
    pub async fn get_token(&self) -> Option<String> {
        self.read_present(TOKEN_KEY).await
    }

    /// The stored user id.
    pub async fn get_user_id(&self) -> Option<String> {
        self.read_present(USER_ID_KEY).await
    }

    /// Whether a token is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.get_token().await.is_some()
    }

    /// Remove both values, retrying up to [`CLEAR_AUTH_RETRIES`] times.
    pub async fn clear_auth(&self) -> ClearOutcome {
        self.clear_auth_with_retries(CLEAR_AUTH_RETRIES).await
    }

    /// Remove both values and verify they are gone.
    ///
    /// A failed removal or a value that is still readable afterwards counts
    /// as a failed attempt. After `retry_count` retries the failure is
    /// logged and [`ClearOutcome::GaveUp`] is returned.
    pub async fn clear_auth_with_retries(&self, retry_count: u32) -> ClearOutcome {
        let mut attempts = 0;

        loop {
            match self.attempt_clear().await {
                Ok(()) => return ClearOutcome::Cleared,
                Err(reason) if attempts < retry_count => {
                    attempts += 1;
                    tracing::warn!(
                        reason = %reason,
                        "Retrying to clear auth ({attempts}/{retry_count})"
                    );
                }
                Err(reason) => {
                    tracing::error!(
                        reason = %reason,
                        "Error clearing auth after multiple attempts"
                    );
                    return ClearOutcome::GaveUp;
                }
            }
        }
    }

    async fn attempt_clear(&self) -> Result<(), String> {
        self.backend
            .remove(TOKEN_KEY)
            .await
            .map_err(|e| e.to_string())?;
        self.backend
            .remove(USER_ID_KEY)
            .await
            .map_err(|e| e.to_string())?;

        if self.get_token().await.is_none() && self.get_user_id().await.is_none() {
            Ok(())
        } else {
            Err("Failed to clear auth".to_string())
        }
    }

    /// Read a value, treating empty strings and read errors as absent.
    async fn read_present(&self, key: &str) -> Option<String> {
        match self.backend.read(key).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, key, "Failed to read credential");
                None
            }
        }
    }
}

/// `Authorization` and `Content-Type` headers for a credential.
///
/// Returns `None` if the token contains bytes not allowed in a header.
#[must_use]
pub fn auth_headers(credential: &Credential) -> Option<HeaderMap> {
    let mut authorization = HeaderValue::from_str(&credential.bearer()).ok()?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, authorization);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Some(headers)
}
