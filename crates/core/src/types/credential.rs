//! Bearer credential held for the visitor.

use secrecy::{ExposeSecret, SecretString};

/// A bearer token paired with the user id it was issued for.
///
/// The token is kept in a [`SecretString`] so `Debug` output never
/// contains it.
#[derive(Debug, Clone)]
pub struct Credential {
    token: SecretString,
    user_id: String,
}

impl Credential {
    /// Create a credential from a token and user id.
    #[must_use]
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            user_id: user_id.into(),
        }
    }

    /// The raw bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// The user id the token belongs to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Value for an `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}
