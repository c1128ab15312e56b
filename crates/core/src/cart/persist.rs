//! Persisted cart layout.
//!
//! The cart is stored under [`CART_STORAGE_KEY`] as a JSON array of
//! `{id, name, price, quantity}` objects. There is no version field; anything
//! that is not an array restores to an empty cart. Individual entries are
//! coerced leniently and dropped when their quantity is not positive.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::Value;

use super::{Cart, CartLineItem};
use crate::product::{PLACEHOLDER_ID, PLACEHOLDER_NAME};
use crate::types::{ProductId, coerce_id, coerce_price};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

impl Cart {
    /// Serialize the line items in the persisted layout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which only happens for
    /// prices that cannot be represented as a JSON number.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Restore a cart from persisted text.
    ///
    /// Parse failures are logged and yield an empty cart.
    #[must_use]
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!(error = %e, "stored cart is not valid JSON, starting empty");
                Self::new()
            }
        }
    }

    /// Restore a cart from an already parsed JSON value.
    ///
    /// Entries sharing an id are merged so the one-line-per-product
    /// invariant holds even for hand-edited storage.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(entries) = value.as_array() else {
            tracing::warn!("stored cart is not an array, starting empty");
            return Self::new();
        };

        let mut items: Vec<CartLineItem> = Vec::with_capacity(entries.len());
        let mut positions: HashMap<ProductId, usize> = HashMap::new();
        let mut dropped = 0_usize;

        for entry in entries {
            let Some(line) = restore_line(entry) else {
                dropped += 1;
                continue;
            };

            if let Some(existing) = positions.get(&line.id).and_then(|&i| items.get_mut(i)) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                if existing.price.is_zero() {
                    existing.price = line.price;
                }
            } else {
                positions.insert(line.id.clone(), items.len());
                items.push(line);
            }
        }

        if dropped > 0 {
            tracing::debug!(dropped, "discarded stored cart entries without quantity");
        }

        Self { items }
    }
}

fn restore_line(entry: &Value) -> Option<CartLineItem> {
    let object = entry.as_object()?;

    let quantity = object.get("quantity").map_or(0, coerce_quantity);
    if quantity == 0 {
        return None;
    }

    let id = object
        .get("id")
        .and_then(coerce_id)
        .unwrap_or_else(|| PLACEHOLDER_ID.to_owned());
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(PLACEHOLDER_NAME)
        .to_owned();
    let price = object.get("price").map_or(Decimal::ZERO, coerce_price);

    Some(CartLineItem {
        id: ProductId::new(id),
        name,
        price,
        quantity,
    })
}

/// Coerce a stored quantity, truncating fractions. Non-positive and
/// non-numeric values become zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn coerce_quantity(value: &Value) -> u32 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 1.0 => n.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}
