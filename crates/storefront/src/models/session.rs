//! Session-related types.

/// Session keys for per-visitor view state.
///
/// Credential keys live with the credential store in
/// [`crate::services::credentials`].
pub mod keys {
    /// Key for the visitor's local copy of the cart (rows plus selection).
    pub const CART_VIEW: &str = "cart_view";
}
