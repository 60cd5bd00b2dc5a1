//! `PostgreSQL` persistence for the storefront.
//!
//! The backend-as-a-service owns products, orders and users; the database
//! only holds what the storefront keeps for its visitors:
//!
//! ## Tables
//!
//! - `tower_sessions.session` - Session storage (created by the session store)
//! - `storefront.kv_store` - Key-value documents, e.g. saved favorites
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p prime-optic-cli -- migrate
//! ```

pub mod kv;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use kv::PgKeyValueStore;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Check the database answers, for readiness probes.
///
/// # Errors
///
/// Returns `sqlx::Error` if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
