//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use prime_optic_storefront::backend::Backend;
use prime_optic_storefront::config::{ConfigError, StorefrontConfig};

/// Load the storefront configuration, reading `.env` first.
pub(crate) fn load_config() -> Result<StorefrontConfig, ConfigError> {
    dotenvy::dotenv().ok();
    StorefrontConfig::from_env()
}

/// The Firebase backend, or `None` when it is not configured.
pub(crate) fn firebase_backend(config: &StorefrontConfig) -> Option<Backend> {
    config
        .firebase
        .as_ref()
        .map(|firebase| Backend::from_config(Some(firebase)))
}
