//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `EASHOP_API_URL` - Upstream REST API base URL
//!   (default: <http://localhost/ecommerce-api/public/api>)
//! - `EASHOP_CART_USER_ID` - User whose cart rows are shown (default: 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use eashop_core::UserId;
use thiserror::Error;
use url::Url;

/// Default upstream API location.
pub const DEFAULT_API_URL: &str = "http://localhost/ecommerce-api/public/api";

/// Default cart owner.
pub const DEFAULT_CART_USER_ID: i32 = 1;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Upstream REST API configuration
    pub api: ApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Upstream REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (no trailing slash)
    pub base_url: String,
    /// User id the cart is filtered to and mutated for
    pub cart_user_id: UserId,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let api = ApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            api,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    /// Load the upstream API settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `EASHOP_API_URL` is not an absolute HTTP(S)
    /// URL or `EASHOP_CART_USER_ID` is not an integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_api_url(
            "EASHOP_API_URL",
            &get_env_or_default("EASHOP_API_URL", DEFAULT_API_URL),
        )?;
        let cart_user_id =
            parse_env_or_default::<i32>("EASHOP_CART_USER_ID", &DEFAULT_CART_USER_ID.to_string())?;

        Ok(Self {
            base_url,
            cart_user_id: UserId::new(cart_user_id),
        })
    }

    /// Build a config for an explicit base URL with the default cart user.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute HTTP(S) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_api_url("base_url", base_url)?,
            cart_user_id: UserId::new(DEFAULT_CART_USER_ID),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate an API base URL and strip any trailing slash.
fn normalize_api_url(var_name: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(value.trim_end_matches('/').to_string())
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: base_url.to_string(),
            api: ApiConfig::with_base_url(DEFAULT_API_URL).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        assert!(!test_config("http://localhost:3000").is_secure());
        assert!(test_config("https://shop.example").is_secure());
    }

    #[test]
    fn test_normalize_api_url_strips_trailing_slash() {
        let url = normalize_api_url("TEST_VAR", "http://localhost/api/").unwrap();
        assert_eq!(url, "http://localhost/api");
    }

    #[test]
    fn test_normalize_api_url_rejects_relative() {
        let result = normalize_api_url("TEST_VAR", "/api");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_normalize_api_url_rejects_other_schemes() {
        let result = normalize_api_url("TEST_VAR", "ftp://localhost/api");
        assert!(result.is_err());
    }

    #[test]
    fn test_with_base_url_uses_default_cart_user() {
        let api = ApiConfig::with_base_url("http://127.0.0.1:8080").unwrap();
        assert_eq!(api.base_url, "http://127.0.0.1:8080");
        assert_eq!(api.cart_user_id, UserId::new(1));
    }
}
