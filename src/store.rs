//! The in-memory product collection.
//!
//! [`ProductStore`] is the only owner of product records. It is built once,
//! wrapped in an `Arc` and handed to the routes that need it; every test
//! builds its own. Callers get clones back, never references into the
//! collection.
//!
//! Connections are served on tokio's multi-threaded runtime, so the
//! collection sits behind a [`RwLock`]: reads share it, `insert` / `replace` /
//! `remove` hold it exclusively and are atomic with respect to each other.
//! Nothing awaits while a guard is alive.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::product::{self, Product, ProductDraft};

/// Statistics key for products without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Owner of the product collection. Insertion order is preserved.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: RwLock<Vec<Product>>,
}

impl ProductStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the demo catalogue. Ids are generated as usual.
    pub fn with_fixtures() -> Self {
        let store = Self::new();
        for draft in product::fixtures() {
            store.insert(draft);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }

    /// Products in insertion order, restricted to `category` when given.
    pub fn list(&self, category: Option<&str>) -> Vec<Product> {
        self.products
            .read()
            .iter()
            .filter(|p| category.is_none_or(|c| p.category.as_deref() == Some(c)))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.products.read().iter().find(|p| p.id == id).cloned()
    }

    /// Stores `draft` under a fresh random id and appends it.
    pub fn insert(&self, draft: ProductDraft) -> Product {
        let product = draft.into_product(Uuid::new_v4().to_string());
        self.products.write().push(product.clone());
        product
    }

    /// Overwrites the product at `id` in place. `id` itself never changes.
    ///
    /// Returns `None` when no product has that id.
    pub fn replace(&self, id: &str, draft: ProductDraft) -> Option<Product> {
        let mut products = self.products.write();
        let slot = products.iter_mut().find(|p| p.id == id)?;
        *slot = draft.into_product(id.to_owned());
        Some(slot.clone())
    }

    /// Removes the product at `id`, keeping the rest in order.
    ///
    /// Returns the removed product, or `None` when no product has that id.
    pub fn remove(&self, id: &str) -> Option<Product> {
        let mut products = self.products.write();
        let index = products.iter().position(|p| p.id == id)?;
        Some(products.remove(index))
    }

    /// Products whose name contains `query`, ignoring case. `""` matches all.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        self.products
            .read()
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Product count per category, recomputed on every call.
    pub fn statistics(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for p in self.products.read().iter() {
            let key = p.category.as_deref().unwrap_or(UNCATEGORIZED);
            *counts.entry(key.to_owned()).or_insert(0) += 1;
        }
        counts
    }
}
