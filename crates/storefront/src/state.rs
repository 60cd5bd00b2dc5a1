//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::Backend;
use crate::config::StorefrontConfig;
use crate::stores::{AuthStore, CatalogStore, KeyValueStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Per-visitor state (cart, checkout, signed-in
/// user) is not kept here but in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: Backend,
    catalog: CatalogStore,
    auth: AuthStore,
    kv: Arc<dyn KeyValueStore>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `backend` - Backend collaborators
    /// * `kv` - Persistence for favorites
    /// * `pool` - `PostgreSQL` pool, when a database is configured
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        backend: Backend,
        kv: Arc<dyn KeyValueStore>,
        pool: Option<PgPool>,
    ) -> Self {
        let catalog = CatalogStore::new(backend.products.clone(), config.catalog_cache_ttl);
        let auth = AuthStore::new(&backend);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                catalog,
                auth,
                kv,
                pool,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend collaborators.
    #[must_use]
    pub fn backend(&self) -> &Backend {
        &self.inner.backend
    }

    /// Get a reference to the cached catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }

    /// Get a handle to the key-value store.
    #[must_use]
    pub fn kv(&self) -> Arc<dyn KeyValueStore> {
        self.inner.kv.clone()
    }

    /// Get a reference to the database pool, if one is configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
