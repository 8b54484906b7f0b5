//! Eashop Core - Shared types library.
//!
//! This crate provides common types used across all Eashop components:
//! - `storefront` - Server-rendered storefront over the upstream REST API
//! - `cli` - Command-line client for the same API
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog and cart records, credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
