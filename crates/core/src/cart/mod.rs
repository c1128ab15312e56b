//! Shopping cart state.
//!
//! [`Cart`] is the pure in-memory collection of line items. It never fails:
//! malformed products resolve to placeholder values and unknown ids are
//! ignored. [`CartManager`] wraps a cart together with a [`KeyValueStore`]
//! and writes the collection back after every mutation.
//!
//! # Invariants
//!
//! - At most one line item per [`ProductId`].
//! - Every line item has `quantity > 0`; reaching zero removes the line.
//! - Prices are never negative.
//!
//! [`KeyValueStore`]: crate::store::KeyValueStore

mod manager;
pub(crate) mod persist;

pub use manager::CartManager;
pub use persist::CART_STORAGE_KEY;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::{PLACEHOLDER_ID, ProductRecord};
use crate::types::ProductId;

/// One product in the cart with its aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Canonical product identifier.
    pub id: ProductId,
    /// Display name at the time the product was first added.
    pub name: String,
    /// Unit price, zero when the product had none.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Number of units, always at least one.
    pub quantity: u32,
}

impl CartLineItem {
    /// `price * quantity` for this line, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// The cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Borrow the line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Owned copy of the line items for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.items.clone()
    }

    /// Look up a line item by its string id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Add one unit of `product`.
    ///
    /// An existing line with the same id gains one unit and, if its stored
    /// price is zero, takes the freshly resolved price when that is positive.
    /// Otherwise a new line with quantity 1 is appended.
    ///
    /// Returns the id the product resolved to.
    pub fn add_item(&mut self, product: &ProductRecord) -> ProductId {
        let id = product.id().unwrap_or_else(|| {
            tracing::warn!("product has no identifier, using placeholder id");
            ProductId::new(PLACEHOLDER_ID)
        });
        let price = product.price();
        if price.is_zero() {
            tracing::debug!(product_id = %id, "adding product with zero price");
        }

        if let Some(existing) = self.items.iter_mut().find(|item| item.id == id) {
            existing.quantity = existing.quantity.saturating_add(1);
            if existing.price.is_zero() && price > Decimal::ZERO {
                existing.price = price;
            }
        } else {
            self.items.push(CartLineItem {
                id: id.clone(),
                name: product.name(),
                price,
                quantity: 1,
            });
        }

        id
    }

    /// Remove the line with `id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id.as_str() != id);
        self.items.len() != before
    }

    /// Add `delta` to the quantity of the line with `id`.
    ///
    /// A resulting quantity of zero or less removes the line. Unknown ids
    /// are ignored. Returns whether the cart changed.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id.as_str() == id) else {
            return false;
        };
        if delta == 0 {
            return false;
        }

        let current = self.items.get(index).map_or(0, |item| i64::from(item.quantity));
        let next = current.saturating_add(delta);
        if next <= 0 {
            self.items.remove(index);
        } else if let Some(item) = self.items.get_mut(index) {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` across all lines, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
