//! CLI subcommand implementations.

pub mod cart;
pub mod catalog;

use eashop_storefront::api::{ApiClient, ApiError};
use eashop_storefront::config::{ApiConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Invalid API configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upstream API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The cart could not be fetched; details are in the log.
    #[error("Cart is unavailable")]
    CartUnavailable,

    /// No cart row for the given product and size.
    #[error("No cart row for product {product} size {size}")]
    LineNotFound { product: i32, size: i32 },

    /// Quantity below 1.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// Load the API settings and build a client.
fn connect() -> Result<(ApiClient, ApiConfig), CommandError> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;
    tracing::info!("Using Eashop API at {}", config.base_url);

    Ok((ApiClient::new(&config), config))
}
