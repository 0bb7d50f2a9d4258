//! Persisted shopping cart.
//!
//! The cart is an ordered list of [`CartItem`] lines, in the order they were
//! first added. Every mutation is written through to the injected
//! [`KeyValueStore`] as the full serialized list under one key.
//!
//! A mutation and its write form one unit: when the write fails, the
//! in-memory change is rolled back, the observer hears about it, and the
//! error is returned to the caller.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use wardrobe_core::{CartItem, LineId, Product};

use crate::config::DEFAULT_CART_KEY;
use crate::persistence::{KeyValueStore, StoreError};

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Writing the cart to the store failed.
    #[error("Failed to persist cart: {0}")]
    Persist(#[from] StoreError),

    /// Serializing the cart failed.
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No line with this id is in the cart.
    #[error("Cart line not found: {0}")]
    LineNotFound(LineId),
}

/// Receives cart persistence problems.
pub trait CartObserver: Send + Sync {
    /// A save failed; the mutation that triggered it has been rolled back.
    fn on_persist_error(&self, error: &CartError);

    /// The stored cart could not be read or decoded and was reset to empty.
    fn on_load_reset(&self, _reason: &str) {}
}

/// Owns the cart lines and keeps them in sync with persistent storage.
pub struct CartStore {
    items: Vec<CartItem>,
    store: Arc<dyn KeyValueStore>,
    key: String,
    observer: Option<Arc<dyn CartObserver>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty cart over `store` using the default key.
    ///
    /// Call [`CartStore::load`] to pick up a previously saved cart.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY)
    }

    /// Create an empty cart stored under a custom key.
    #[must_use]
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            store,
            key: key.into(),
            observer: None,
        }
    }

    /// Attach an observer for persistence failures.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CartObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace the in-memory lines with the persisted cart.
    ///
    /// A missing entry leaves the cart empty. A read or decode failure also
    /// resets to empty; it is logged and reported but never returned.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&mut self) {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                self.reset_after_failed_load(&format!("read failed: {e}"));
                return;
            }
        };

        let Some(raw) = raw else {
            debug!("No saved cart");
            self.items.clear();
            return;
        };

        match serde_json::from_str::<Vec<CartItem>>(&raw) {
            Ok(items) => {
                debug!(lines = items.len(), "Loaded cart");
                self.items = items;
            }
            Err(e) => self.reset_after_failed_load(&format!("decode failed: {e}")),
        }
    }

    fn reset_after_failed_load(&mut self, reason: &str) {
        warn!(reason, "Discarding unreadable cart");
        self.items.clear();
        if let Some(observer) = &self.observer {
            observer.on_load_reset(reason);
        }
    }

    /// Write the full cart to the store.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if serialization or the write fails. The failure
    /// is also reported to the observer.
    pub fn save(&self) -> Result<(), CartError> {
        let result = self.write();
        if let Err(e) = &result {
            warn!(error = %e, "Failed to save cart");
            if let Some(observer) = &self.observer {
                observer.on_persist_error(e);
            }
        }
        result
    }

    fn write(&self) -> Result<(), CartError> {
        let blob = serde_json::to_string(&self.items)?;
        self.store.set(&self.key, &blob)?;
        Ok(())
    }

    /// Apply `mutation` and save; restore the previous lines if saving fails.
    fn commit<T>(
        &mut self,
        mutation: impl FnOnce(&mut Vec<CartItem>) -> Result<T, CartError>,
    ) -> Result<T, CartError> {
        let snapshot = self.items.clone();
        let value = mutation(&mut self.items)?;
        if let Err(e) = self.save() {
            self.items = snapshot;
            return Err(e);
        }
        Ok(value)
    }

    /// Add one unit of `product` in `size`.
    ///
    /// Increments the existing line for the same product and size, or
    /// appends a new line with quantity 1. Returns the affected line.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be saved; nothing changes then.
    #[instrument(skip(self, product), fields(product_id = %product.id()))]
    pub fn add_item(&mut self, product: &Product, size: &str) -> Result<LineId, CartError> {
        self.commit(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.matches(product, size)) {
                item.increment();
                return Ok(item.line_id());
            }
            let item = CartItem::new(product.clone(), size);
            let line_id = item.line_id();
            items.push(item);
            Ok(line_id)
        })
    }

    /// Remove exactly the line `line_id`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` for an unknown line, or a save error.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, line_id: LineId) -> Result<(), CartError> {
        self.commit(|items| {
            let index = position(items, line_id)?;
            items.remove(index);
            Ok(())
        })
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` for an unknown line, or a save error.
    pub fn increment(&mut self, line_id: LineId) -> Result<(), CartError> {
        self.commit(|items| {
            let index = position(items, line_id)?;
            if let Some(item) = items.get_mut(index) {
                item.increment();
            }
            Ok(())
        })
    }

    /// Remove one unit from a line; a line at quantity 1 is removed entirely.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` for an unknown line, or a save error.
    pub fn decrement(&mut self, line_id: LineId) -> Result<(), CartError> {
        self.commit(|items| {
            let index = position(items, line_id)?;
            let still_present = items.get_mut(index).is_some_and(CartItem::decrement);
            if !still_present {
                items.remove(index);
            }
            Ok(())
        })
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the empty cart cannot be saved.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(|items| {
            items.clear();
            Ok(())
        })
    }

    /// Cart lines in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, line_id: LineId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.line_id() == line_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |total, item| total.saturating_add(item.quantity()))
    }

    /// Sum of `quantity × price` over all lines, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.line_total()))
    }
}

fn position(items: &[CartItem], line_id: LineId) -> Result<usize, CartError> {
    items
        .iter()
        .position(|item| item.line_id() == line_id)
        .ok_or(CartError::LineNotFound(line_id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parking_lot::Mutex;
    use serde_json::json;
    use wardrobe_core::ProductId;

    use super::*;
    use crate::persistence::MemoryStore;
    use crate::testing::{FailingStore, UnreadableStore};

    fn product(id: i64, cents: i64) -> Product {
        Product::new(
            ProductId::new(id),
            format!("Product {id}"),
            Decimal::new(cents, 2),
            vec![],
            vec!["S".to_string(), "M".to_string(), "L".to_string()],
        )
    }

    fn cart() -> (CartStore, MemoryStore) {
        let backing = MemoryStore::new();
        (CartStore::new(Arc::new(backing.clone())), backing)
    }

    #[derive(Default)]
    struct RecordingObserver {
        persist_errors: Mutex<Vec<String>>,
        resets: Mutex<Vec<String>>,
    }

    impl CartObserver for RecordingObserver {
        fn on_persist_error(&self, error: &CartError) {
            self.persist_errors.lock().push(error.to_string());
        }

        fn on_load_reset(&self, reason: &str) {
            self.resets.lock().push(reason.to_string());
        }
    }

    #[test]
    fn test_add_same_pair_increments() {
        let (mut cart, _) = cart();
        let p = product(1, 1000);

        let m1 = cart.add_item(&p, "M").unwrap();
        let m2 = cart.add_item(&p, "M").unwrap();
        let l = cart.add_item(&p, "L").unwrap();

        assert_eq!(m1, m2);
        assert_ne!(m1, l);
        assert_eq!(cart.len(), 2);
        let items = cart.items();
        assert_eq!(items[0].size(), "M");
        assert_eq!(items[0].quantity(), 2);
        assert_eq!(items[1].size(), "L");
        assert_eq!(items[1].quantity(), 1);
        assert_eq!(cart.total_count(), 3);
    }

    #[test]
    fn test_uniqueness_over_many_adds() {
        let (mut cart, _) = cart();
        let products = [product(1, 100), product(2, 250), product(3, 999)];
        let sizes = ["S", "M", "L"];
        let mut expected = std::collections::HashMap::new();

        for step in 0..40_usize {
            let p = &products[step % 3];
            let size = sizes[(step / 3) % 3];
            cart.add_item(p, size).unwrap();
            *expected.entry((p.id(), size)).or_insert(0_u32) += 1;
        }

        assert_eq!(cart.len(), expected.len());
        for item in cart.items() {
            assert_eq!(
                expected[&(item.product().id(), item.size())],
                item.quantity()
            );
        }
    }

    #[test]
    fn test_totals_follow_mutations() {
        let (mut cart, _) = cart();
        let shirt = product(1, 1999);
        let socks = product(2, 450);

        assert_eq!(cart.total_count(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);

        let shirt_line = cart.add_item(&shirt, "M").unwrap();
        cart.add_item(&socks, "S").unwrap();
        cart.increment(shirt_line).unwrap();
        assert_eq!(cart.total_count(), 3);
        assert_eq!(cart.total_price(), Decimal::new(1999 * 2 + 450, 2));

        cart.decrement(shirt_line).unwrap();
        assert_eq!(cart.total_count(), 2);
        assert_eq!(cart.total_price(), Decimal::new(1999 + 450, 2));
    }

    #[test]
    fn test_totals_saturate_on_huge_prices() {
        let (mut cart, _) = cart();
        let gold = Product::new(ProductId::new(1), "Gold", Decimal::MAX, vec![], vec![]);
        let platinum = Product::new(ProductId::new(2), "Platinum", Decimal::MAX, vec![], vec![]);

        let line = cart.add_item(&gold, "M").unwrap();
        cart.increment(line).unwrap();
        cart.add_item(&platinum, "M").unwrap();

        assert_eq!(cart.total_count(), 3);
        assert_eq!(cart.total_price(), Decimal::MAX);
    }

    #[test]
    fn test_load_absurd_lines_resets_to_empty() {
        let blobs = [
            json!([
                {"product": {"id": 1, "price": "1"}, "size": "M", "quantity": 3_000_000_000_u64},
                {"product": {"id": 2, "price": "1"}, "size": "M", "quantity": 3_000_000_000_u64}
            ]),
            json!([{
                "product": {"id": 3, "price": "79228162514264337593543950335"},
                "size": "M",
                "quantity": 2
            }]),
        ];

        for blob in blobs {
            let backing = MemoryStore::new();
            backing.set(DEFAULT_CART_KEY, &blob.to_string()).unwrap();
            let observer = Arc::new(RecordingObserver::default());

            let mut cart = CartStore::new(Arc::new(backing)).with_observer(observer.clone());
            cart.load();

            assert!(cart.is_empty());
            assert_eq!(cart.total_count(), 0);
            assert_eq!(cart.total_price(), Decimal::ZERO);
            assert_eq!(observer.resets.lock().len(), 1);
        }
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let (mut cart, _) = cart();
        let line = cart.add_item(&product(1, 100), "M").unwrap();

        cart.decrement(line).unwrap();
        assert!(cart.is_empty());
        assert!(matches!(
            cart.decrement(line),
            Err(CartError::LineNotFound(id)) if id == line
        ));
    }

    #[test]
    fn test_remove_targets_exact_line() {
        // Two lines for the same pair can only come from persisted data.
        let backing = MemoryStore::new();
        let p = product(7, 500);
        let first = CartItem::new(p.clone(), "M");
        let second = CartItem::new(p, "M");
        backing
            .set(
                DEFAULT_CART_KEY,
                &serde_json::to_string(&[first.clone(), second.clone()]).unwrap(),
            )
            .unwrap();

        let mut cart = CartStore::new(Arc::new(backing));
        cart.load();
        assert_eq!(cart.len(), 2);

        cart.remove_item(second.line_id()).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].line_id(), first.line_id());
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let (mut cart, backing) = cart();
        let line = cart.add_item(&product(1, 100), "M").unwrap();

        let saved: Vec<CartItem> =
            serde_json::from_str(&backing.get(DEFAULT_CART_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved, cart.items());

        cart.increment(line).unwrap();
        let saved: Vec<CartItem> =
            serde_json::from_str(&backing.get(DEFAULT_CART_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved[0].quantity(), 2);

        cart.clear().unwrap();
        assert_eq!(backing.get(DEFAULT_CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_round_trip() {
        let (mut cart, backing) = cart();
        cart.add_item(&product(1, 100), "M").unwrap();
        cart.add_item(&product(2, 200), "L").unwrap();

        let mut reloaded = CartStore::new(Arc::new(backing));
        reloaded.load();
        assert_eq!(reloaded.items(), cart.items());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (mut cart, _) = cart();
        cart.load();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_load_garbage_resets_to_empty() {
        let backing = MemoryStore::new();
        backing.set(DEFAULT_CART_KEY, "{not json").unwrap();
        let observer = Arc::new(RecordingObserver::default());

        let mut cart = CartStore::new(Arc::new(backing)).with_observer(observer.clone());
        cart.load();

        assert!(cart.is_empty());
        assert_eq!(observer.resets.lock().len(), 1);
    }

    #[test]
    fn test_load_read_failure_resets_to_empty() {
        let observer = Arc::new(RecordingObserver::default());
        let mut cart =
            CartStore::new(Arc::new(UnreadableStore::default())).with_observer(observer.clone());
        cart.load();

        assert!(cart.is_empty());
        let resets = observer.resets.lock();
        assert_eq!(resets.len(), 1);
        assert!(resets[0].contains("read failed"));
    }

    #[test]
    fn test_load_invalid_item_resets_to_empty() {
        let backing = MemoryStore::new();
        backing
            .set(
                DEFAULT_CART_KEY,
                &json!([{"product": {"name": "no id"}, "size": "M", "quantity": 1}]).to_string(),
            )
            .unwrap();
        let mut cart = CartStore::new(Arc::new(backing));
        cart.load();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_failed_save_rolls_back_and_notifies() {
        let observer = Arc::new(RecordingObserver::default());
        let mut cart =
            CartStore::new(Arc::new(FailingStore::default())).with_observer(observer.clone());

        let err = cart.add_item(&product(1, 100), "M").unwrap_err();
        assert!(matches!(err, CartError::Persist(_)));
        assert!(cart.is_empty());
        assert_eq!(observer.persist_errors.lock().len(), 1);
    }

    #[test]
    fn test_custom_key() {
        let backing = MemoryStore::new();
        let mut cart = CartStore::with_key(Arc::new(backing.clone()), "bag");
        cart.add_item(&product(1, 100), "M").unwrap();
        assert!(backing.get("bag").unwrap().is_some());
        assert!(backing.get(DEFAULT_CART_KEY).unwrap().is_none());
    }
}
