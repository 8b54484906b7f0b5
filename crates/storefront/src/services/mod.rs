//! Services over the upstream REST API and the visitor's session.
//!
//! # Services
//!
//! - `catalog` - Products with category/size enrichment, lookup lists
//! - `cart` - Cart rows for the configured user and their mutations
//! - `credentials` - Bearer token and user id kept in the session

pub mod cart;
pub mod catalog;
pub mod credentials;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use credentials::{ClearOutcome, CredentialStore};
