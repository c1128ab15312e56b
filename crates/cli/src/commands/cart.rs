//! Local cart commands.
//!
//! Operates on a cart persisted in a JSON file, using the same cart rules as
//! the storefront. Handy for inspecting product payloads from the backend.
//!
//! # Usage
//!
//! ```bash
//! nordic-cli cart add '{"productId": 7, "title": "Headphones", "listPrice": "129.00"}'
//! nordic-cli cart change 7 2
//! nordic-cli cart show
//! nordic-cli cart --store /tmp/other.json clear
//! ```

use std::fmt::Write as _;

use nordic_core::store::KeyValueStore;
use nordic_core::{Cart, CartManager, ProductRecord, format_price};
use serde_json::Value;
use thiserror::Error;

/// Cart file used when `--store` is not given.
pub const DEFAULT_CART_FILE: &str = ".nordic/cart.json";

/// Errors from cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("Invalid product JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Product must be a JSON object")]
    NotAnObject,
}

/// Render the stored cart.
pub fn show<S: KeyValueStore>(store: S) -> String {
    render(CartManager::load(store).cart())
}

/// Add one unit of the product described by `product_json`.
///
/// # Errors
///
/// Returns an error if the argument is not a JSON object.
pub fn add<S: KeyValueStore>(store: S, product_json: &str) -> Result<String, CartCommandError> {
    let value: Value = serde_json::from_str(product_json)?;
    if !value.is_object() {
        return Err(CartCommandError::NotAnObject);
    }

    let mut manager = CartManager::load(store);
    let id = manager.add_item(&ProductRecord::from(value));
    tracing::info!(product_id = %id, "added to cart");
    Ok(render(manager.cart()))
}

/// Remove a line item.
pub fn remove<S: KeyValueStore>(store: S, id: &str) -> String {
    let mut manager = CartManager::load(store);
    manager.remove_item(id);
    render(manager.cart())
}

/// Change a line's quantity by `delta`.
pub fn change<S: KeyValueStore>(store: S, id: &str, delta: i64) -> String {
    let mut manager = CartManager::load(store);
    manager.change_quantity(id, delta);
    render(manager.cart())
}

/// Empty the cart.
pub fn clear<S: KeyValueStore>(store: S) -> String {
    let mut manager = CartManager::load(store);
    manager.clear();
    render(manager.cart())
}

/// One line per item, then the totals.
#[must_use]
pub fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for line in cart.items() {
        let _ = writeln!(
            out,
            "{}  {}  {} x {} = {}",
            line.id,
            line.name,
            line.quantity,
            format_price(line.price),
            format_price(line.subtotal()),
        );
    }
    let _ = write!(
        out,
        "Total: {} items, {}",
        cart.total_items(),
        format_price(cart.total_price())
    );
    out
}
