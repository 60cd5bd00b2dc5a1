//! Saved products.
//!
//! A write-through cache over a [`KeyValueStore`]: the in-memory list is only
//! replaced after the new list has been saved, so what the visitor sees is
//! always what a reload would return.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use prime_optic_core::ProductId;

use super::kv::{KeyValueStore, StoreError};
use crate::models::Product;

/// Fixed storage name; the owner id is appended to form the key.
pub const FAVORITES_STORAGE: &str = "favorites-storage";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedFavorites {
    #[serde(default)]
    favorites: Vec<Product>,
}

/// Favorites of one owner (a signed-in user or an anonymous device).
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    favorites: Vec<Product>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .field("favorites", &self.favorites.len())
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Storage key for an owner.
    #[must_use]
    pub fn storage_key(owner: &str) -> String {
        format!("{FAVORITES_STORAGE}:{owner}")
    }

    /// Rehydrate an owner's favorites.
    ///
    /// A stored value that no longer decodes is discarded with a warning and
    /// the owner starts with an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(store: Arc<dyn KeyValueStore>, owner: &str) -> Result<Self, StoreError> {
        let key = Self::storage_key(owner);
        let favorites = match store.load(&key).await? {
            Some(value) => match serde_json::from_value::<PersistedFavorites>(value) {
                Ok(persisted) => persisted.favorites,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding unreadable favorites");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self {
            store,
            key,
            favorites,
        })
    }

    async fn persist(&mut self, favorites: Vec<Product>) -> Result<(), StoreError> {
        let value = serde_json::to_value(PersistedFavorites { favorites })?;
        self.store.save(&self.key, &value).await?;
        // Keep exactly what was written.
        self.favorites = serde_json::from_value::<PersistedFavorites>(value)?.favorites;
        Ok(())
    }

    /// Save a product snapshot. Adding a product twice changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the new set cannot be persisted; the set is then
    /// left unchanged.
    pub async fn add_to_favorites(&mut self, product: Product) -> Result<(), StoreError> {
        if self.is_favorite(&product.id) {
            return Ok(());
        }
        let mut favorites = self.favorites.clone();
        favorites.push(product);
        self.persist(favorites).await
    }

    /// Forget a product; no-op if it is not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the new set cannot be persisted.
    pub async fn remove_from_favorites(&mut self, id: &ProductId) -> Result<(), StoreError> {
        if !self.is_favorite(id) {
            return Ok(());
        }
        let favorites = self
            .favorites
            .iter()
            .filter(|product| &product.id != id)
            .cloned()
            .collect();
        self.persist(favorites).await
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub async fn clear_favorites(&mut self) -> Result<(), StoreError> {
        self.store.remove(&self.key).await?;
        self.favorites.clear();
        Ok(())
    }

    #[must_use]
    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.favorites.iter().any(|product| &product.id == id)
    }

    #[must_use]
    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    /// Saved products in the order they were added.
    #[must_use]
    pub fn favorites(&self) -> &[Product] {
        &self.favorites
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{ProductData, ProductType};
    use crate::stores::kv::MemoryKeyValueStore;
    use prime_optic_core::Price;

    fn product(id: &str) -> Product {
        ProductData::new(
            format!("slug-{id}"),
            format!("Frame {id}"),
            "Prada",
            ProductType::Glasses,
            Price::from_units(120),
        )
        .with_id(id)
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut favorites = FavoritesStore::load(kv, "device-1").await.unwrap();

        favorites.add_to_favorites(product("p1")).await.unwrap();
        favorites.add_to_favorites(product("p1")).await.unwrap();

        assert_eq!(favorites.favorites_count(), 1);
        assert!(favorites.is_favorite(&ProductId::new("p1")));
    }

    #[tokio::test]
    async fn test_reload_reflects_persisted_set() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        {
            let mut favorites = FavoritesStore::load(kv.clone(), "u1").await.unwrap();
            favorites.add_to_favorites(product("p1")).await.unwrap();
            favorites.add_to_favorites(product("p2")).await.unwrap();
            favorites
                .remove_from_favorites(&ProductId::new("p1"))
                .await
                .unwrap();
        }

        let reloaded = FavoritesStore::load(kv.clone(), "u1").await.unwrap();
        assert!(!reloaded.is_favorite(&ProductId::new("p1")));
        assert!(reloaded.is_favorite(&ProductId::new("p2")));

        let other_owner = FavoritesStore::load(kv, "u2").await.unwrap();
        assert_eq!(other_owner.favorites_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_removes_stored_value() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut favorites = FavoritesStore::load(kv.clone(), "u1").await.unwrap();
        favorites.add_to_favorites(product("p1")).await.unwrap();
        favorites.clear_favorites().await.unwrap();

        assert_eq!(favorites.favorites_count(), 0);
        assert!(kv.load(&FavoritesStore::storage_key("u1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_value_starts_empty() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        kv.save(&FavoritesStore::storage_key("u1"), &serde_json::json!({"favorites": 42}))
            .await
            .unwrap();

        let favorites = FavoritesStore::load(kv, "u1").await.unwrap();
        assert_eq!(favorites.favorites_count(), 0);
    }
}
