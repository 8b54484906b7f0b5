//! View-state models for storefront pages.
//!
//! These hold the per-request and per-visitor state the pages are rendered
//! from. They do no I/O; routes load them, mutate them, and persist them.

pub mod cart_view;
pub mod catalog_view;
pub mod session;

pub use cart_view::CartView;
pub use catalog_view::{CatalogFilter, CatalogState};
pub use session::keys as session_keys;
