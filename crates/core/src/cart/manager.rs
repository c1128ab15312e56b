//! Cart bound to a persistent store.

use rust_decimal::Decimal;

use super::persist::CART_STORAGE_KEY;
use super::{Cart, CartLineItem};
use crate::product::ProductRecord;
use crate::store::KeyValueStore;
use crate::types::ProductId;

/// Owns the authoritative cart for one session and mirrors it into a store.
///
/// Storage is best-effort. A failed read starts an empty cart, a failed
/// write is logged and the in-memory cart stays authoritative. None of the
/// operations return an error.
///
/// # Example
///
/// ```rust
/// use nordic_core::cart::CartManager;
/// use nordic_core::product::ProductRecord;
/// use nordic_core::store::MemoryStore;
///
/// let mut cart = CartManager::load(MemoryStore::new());
/// let widget = ProductRecord::from(serde_json::json!({"id": "p1", "price": "19.99"}));
/// cart.add_item(&widget);
/// cart.add_item(&widget);
/// assert_eq!(cart.total_items(), 2);
/// assert_eq!(cart.total_price().to_string(), "39.98");
/// ```
#[derive(Debug)]
pub struct CartManager<S> {
    cart: Cart,
    store: S,
}

impl<S: KeyValueStore> CartManager<S> {
    /// Restore the cart persisted in `store`.
    pub fn load(store: S) -> Self {
        let cart = match store.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => Cart::from_json_str(&raw),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored cart, starting empty");
                Cart::new()
            }
        };

        tracing::debug!(lines = cart.len(), "cart restored");
        Self { cart, store }
    }

    /// Add one unit of `product`. See [`Cart::add_item`].
    pub fn add_item(&mut self, product: &ProductRecord) -> ProductId {
        let id = self.cart.add_item(product);
        self.persist();
        id
    }

    /// Remove the line with `id`, if present.
    pub fn remove_item(&mut self, id: &str) {
        self.cart.remove_item(id);
        self.persist();
    }

    /// Adjust the quantity of the line with `id` by `delta`.
    pub fn change_quantity(&mut self, id: &str, delta: i64) {
        self.cart.change_quantity(id, delta);
        self.persist();
    }

    /// Empty the cart (after checkout or logout).
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Owned copy of the current line items.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.cart.snapshot()
    }

    /// Borrow the underlying cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Borrow the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Release the store, e.g. to flush it elsewhere.
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        let result = self
            .cart
            .to_json()
            .map_err(crate::store::StoreError::from)
            .and_then(|json| self.store.set(CART_STORAGE_KEY, &json));

        if let Err(e) = result {
            tracing::warn!(error = %e, "could not persist cart, keeping it in memory");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{MemoryStore, Result as StoreResult, StoreError};

    fn product(value: serde_json::Value) -> ProductRecord {
        ProductRecord::from(value)
    }

    fn stored(manager: &CartManager<MemoryStore>) -> Option<String> {
        manager.store.get(CART_STORAGE_KEY).unwrap()
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut manager = CartManager::load(MemoryStore::new());
        manager.add_item(&product(json!({"id": "p1", "name": "Widget", "price": "19.99"})));

        let restored = Cart::from_json_str(&stored(&manager).unwrap());
        assert_eq!(restored.get("p1").unwrap().quantity, 1);

        manager.change_quantity("p1", 2);
        let restored = Cart::from_json_str(&stored(&manager).unwrap());
        assert_eq!(restored.get("p1").unwrap().quantity, 3);

        manager.remove_item("p1");
        assert_eq!(stored(&manager).as_deref(), Some("[]"));
    }

    #[test]
    fn test_clear_persists_empty_array() {
        let mut manager = CartManager::load(MemoryStore::new());
        manager.add_item(&product(json!({"id": "p1", "price": 1})));
        manager.add_item(&product(json!({"id": "p2", "price": 2})));

        manager.clear();

        assert_eq!(manager.total_items(), 0);
        assert_eq!(stored(&manager).as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_restores_previous_session() {
        let mut first = CartManager::load(MemoryStore::new());
        first.add_item(&product(json!({"id": "p1", "name": "Widget", "price": "19.99"})));
        first.add_item(&product(json!({"id": "p1"})));
        let store = first.into_store();

        let second = CartManager::load(store);
        assert_eq!(second.total_items(), 2);
        assert_eq!(second.total_price(), Decimal::new(3998, 2));
    }

    #[test]
    fn test_load_malformed_payload_is_empty() {
        let manager = CartManager::load(MemoryStore::with_entry(CART_STORAGE_KEY, "{\"a\":1}"));
        assert!(manager.items().is_empty());

        let manager = CartManager::load(MemoryStore::with_entry(CART_STORAGE_KEY, "garbage"));
        assert!(manager.items().is_empty());
    }

    #[test]
    fn test_write_failure_keeps_cart_in_memory() {
        let mut store = MemoryStore::with_entry(CART_STORAGE_KEY, "[]");
        store.reject_writes(true);

        let mut manager = CartManager::load(store);
        manager.add_item(&product(json!({"id": "p1", "price": 5})));
        manager.add_item(&product(json!({"id": "p1", "price": 5})));

        assert_eq!(manager.total_items(), 2);
        assert_eq!(stored(&manager).as_deref(), Some("[]"));
    }

    struct UnreadableStore;

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("locked".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("locked".to_string()))
        }

        fn remove(&mut self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_failure_starts_empty() {
        let mut manager = CartManager::load(UnreadableStore);
        assert_eq!(manager.total_items(), 0);

        manager.add_item(&product(json!({"id": "p1"})));
        assert_eq!(manager.total_items(), 1);
    }

    #[test]
    fn test_borrowed_store() {
        let mut store = MemoryStore::new();
        {
            let mut manager = CartManager::load(&mut store);
            manager.add_item(&product(json!({"id": "p1", "price": 1})));
        }
        assert!(store.get(CART_STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_snapshot_does_not_alias_state() {
        let mut manager = CartManager::load(MemoryStore::new());
        manager.add_item(&product(json!({"id": "p1"})));

        let mut items = manager.items();
        items[0].quantity = 99;

        assert_eq!(manager.total_items(), 1);
    }
}
