//! Product listings per type and per brand.
//!
//! Listings are cached with `moka` for the configured TTL. A failed fetch is
//! never cached; the listing carries the error message instead so the page
//! can show it next to an empty grid.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::instrument;

use crate::backend::{BackendError, ProductRepository};
use crate::models::{Product, ProductType};
use crate::services::notify::{GENERIC_MESSAGE, readable_message};

/// Shown when a listing fails for an unclassified reason.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load products. Please try again later.";

/// Cache key for a listing.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum ListingKey {
    Type(ProductType),
    /// Lowercased brand slug.
    Brand(String),
}

/// A product listing as shown to the visitor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Listing {
    pub products: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Listing {
    fn failed(err: &BackendError) -> Self {
        let message = readable_message(err);
        let message = if message == GENERIC_MESSAGE {
            LOAD_FAILED_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            products: Vec::new(),
            error: Some(message),
        }
    }
}

/// Cached catalog reads.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogStoreInner>,
}

struct CatalogStoreInner {
    products: Arc<dyn ProductRepository>,
    cache: Cache<ListingKey, Arc<Vec<Product>>>,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("cached_listings", &self.inner.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl CatalogStore {
    #[must_use]
    pub fn new(products: Arc<dyn ProductRepository>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CatalogStoreInner { products, cache }),
        }
    }

    async fn listing<F>(&self, key: ListingKey, fetch: F) -> Listing
    where
        F: Future<Output = Result<Vec<Product>, BackendError>>,
    {
        if let Some(products) = self.inner.cache.get(&key).await {
            return Listing {
                products: products.as_ref().clone(),
                error: None,
            };
        }

        match fetch.await {
            Ok(products) => {
                self.inner
                    .cache
                    .insert(key, Arc::new(products.clone()))
                    .await;
                Listing {
                    products,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(listing = ?key, error = %e, "Failed to load products");
                Listing::failed(&e)
            }
        }
    }

    /// Glasses or sunglasses.
    #[instrument(skip(self))]
    pub async fn products_by_type(&self, product_type: ProductType) -> Listing {
        let products = self.inner.products.clone();
        self.listing(ListingKey::Type(product_type), async move {
            products.fetch_by_type(product_type).await
        })
        .await
    }

    /// A featured brand's products; empty for an unknown slug.
    #[instrument(skip(self))]
    pub async fn products_by_brand(&self, brand_slug: &str) -> Listing {
        let products = self.inner.products.clone();
        let slug = brand_slug.to_lowercase();
        let key = ListingKey::Brand(slug.clone());
        self.listing(key, async move { products.fetch_by_brand(&slug).await })
            .await
    }

    /// Single product for the detail page. Not cached.
    ///
    /// # Errors
    ///
    /// Returns the repository's error.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, BackendError> {
        self.inner.products.fetch_by_slug(slug).await
    }

    /// Drop every cached listing, after a catalog write.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use prime_optic_core::{Price, ProductId};

    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::models::ProductData;

    /// Counts type listings and can be switched to fail them.
    struct Flaky {
        memory: MemoryBackend,
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    #[async_trait]
    impl ProductRepository for Flaky {
        async fn fetch_by_type(&self, product_type: ProductType) -> Result<Vec<Product>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(BackendError::Api {
                    status: 500,
                    message: "x".repeat(120),
                });
            }
            self.memory.fetch_by_type(product_type).await
        }

        async fn fetch_by_brand_name(&self, brand_name: &str) -> Result<Vec<Product>, BackendError> {
            self.memory.fetch_by_brand_name(brand_name).await
        }

        async fn fetch_by_slug(&self, slug: &str) -> Result<Option<Product>, BackendError> {
            self.memory.fetch_by_slug(slug).await
        }

        async fn fetch_by_id(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
            self.memory.fetch_by_id(id).await
        }

        async fn fetch_all(&self) -> Result<Vec<Product>, BackendError> {
            self.memory.fetch_all().await
        }

        async fn create(&self, product: &ProductData) -> Result<ProductId, BackendError> {
            ProductRepository::create(&self.memory, product).await
        }

        async fn update(&self, id: &ProductId, product: &ProductData) -> Result<(), BackendError> {
            self.memory.update(id, product).await
        }

        async fn delete(&self, id: &ProductId) -> Result<(), BackendError> {
            self.memory.delete(id).await
        }
    }

    fn flaky(failing: bool) -> Arc<Flaky> {
        Arc::new(Flaky {
            memory: MemoryBackend::with_products(vec![ProductData::new(
                "round-1",
                "Round",
                "Police",
                ProductType::Glasses,
                Price::from_units(80),
            )]),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(failing),
        })
    }

    #[tokio::test]
    async fn test_listing_is_cached_until_invalidated() {
        let repo = flaky(false);
        let catalog = CatalogStore::new(repo.clone(), Duration::from_secs(60));

        assert_eq!(catalog.products_by_type(ProductType::Glasses).await.products.len(), 1);
        assert_eq!(catalog.products_by_type(ProductType::Glasses).await.products.len(), 1);
        assert_eq!(repo.calls.load(Ordering::SeqCst), 1);

        catalog.invalidate();
        catalog.products_by_type(ProductType::Glasses).await;
        assert_eq!(repo.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_listing_carries_message_and_is_not_cached() {
        let repo = flaky(true);
        let catalog = CatalogStore::new(repo.clone(), Duration::from_secs(60));

        let listing = catalog.products_by_type(ProductType::Glasses).await;
        assert!(listing.products.is_empty());
        assert_eq!(listing.error.as_deref(), Some(LOAD_FAILED_MESSAGE));

        repo.failing.store(false, Ordering::SeqCst);
        let listing = catalog.products_by_type(ProductType::Glasses).await;
        assert_eq!(listing.products.len(), 1);
        assert!(listing.error.is_none());
    }

    #[tokio::test]
    async fn test_unknown_brand_is_empty_without_error() {
        let catalog = CatalogStore::new(flaky(false), Duration::from_secs(60));
        let listing = catalog.products_by_brand("no-such-brand").await;
        assert!(listing.products.is_empty());
        assert!(listing.error.is_none());
    }
}
