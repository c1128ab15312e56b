//! Session keys.

/// Session keys for visitor state.
pub mod keys {
    /// Serialized cart line items; same layout as the core cart store key.
    pub const CART: &str = nordic_core::cart::CART_STORAGE_KEY;
}
