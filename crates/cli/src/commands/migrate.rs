//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! po-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - `PostgreSQL` connection string
//!
//! Runs the storefront migrations (`crates/storefront/migrations/`), then
//! creates the session table used by `tower-sessions-sqlx-store`.

use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use prime_optic_storefront::config::ConfigError;
use prime_optic_storefront::db;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("DATABASE_URL is not set; nothing to migrate")]
    NoDatabase,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if no database is configured or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    let config = super::load_config()?;
    let database_url = config.database_url.ok_or(MigrationError::NoDatabase)?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
