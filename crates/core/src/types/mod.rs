//! Core types for Eashop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod credential;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartItem, CartLineKey, NewCartItem};
pub use credential::Credential;
pub use id::*;
pub use price::Price;
pub use product::{Category, Product, Size};
