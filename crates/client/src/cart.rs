//! Shopping cart kept in client storage.
//!
//! The cart is an ordered list of product snapshots. Adding the same
//! product twice stores two entries; there is no quantity merge. Every
//! change rewrites the whole list under [`CART_KEY`].

use std::sync::{Arc, PoisonError, RwLock};

use emporium_core::{Product, ProductId, format_usd};

use crate::notify::{Notifier, Toast};
use crate::storage::{CART_KEY, KeyValueStore, StorageError};

pub const ITEM_ADDED: &str = "Item Added to cart";

pub struct Cart {
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    entries: RwLock<Vec<Product>>,
}

impl Cart {
    /// Open the cart stored in `storage`.
    ///
    /// Absent, unreadable or malformed data all give an empty cart.
    pub fn load(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let entries = match storage.get(CART_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Stored cart is malformed, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored cart");
                Vec::new()
            }
        };

        Self {
            storage,
            notifier,
            entries: RwLock::new(entries),
        }
    }

    /// Append a snapshot of `product`, persist, and show the confirmation toast.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written. The cart is left unchanged.
    pub fn add(&self, product: &Product) -> Result<(), StorageError> {
        self.update(|entries| entries.push(product.clone()))?;
        self.notifier.notify(Toast::success(ITEM_ADDED));
        Ok(())
    }

    /// Remove the entry at `index`. Out-of-range indexes remove nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn remove_at(&self, index: usize) -> Result<Option<Product>, StorageError> {
        self.update(|entries| (index < entries.len()).then(|| entries.remove(index)))
    }

    /// Remove the first entry for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn remove_product(&self, id: &ProductId) -> Result<Option<Product>, StorageError> {
        self.update(|entries| {
            entries
                .iter()
                .position(|entry| &entry.id == id)
                .map(|index| entries.remove(index))
        })
    }

    /// Current entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<Product> {
        self.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sum of entry prices, without rounding.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.read().iter().map(|entry| entry.price).sum()
    }

    /// [`Cart::total`] formatted as US dollars.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_usd(self.total())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Product>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` to a copy, persist it, then commit it.
    fn update<T>(&self, change: impl FnOnce(&mut Vec<Product>) -> T) -> Result<T, StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        let outcome = change(&mut next);

        let encoded = serde_json::to_string(&next)?;
        self.storage.set(CART_KEY, &encoded)?;

        *entries = next;
        Ok(outcome)
    }
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart").field("entries", &*self.read()).finish()
    }
}
