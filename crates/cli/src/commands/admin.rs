//! User role management.
//!
//! # Usage
//!
//! ```bash
//! po-cli admin promote <uid>
//! po-cli admin demote <uid>
//! ```
//!
//! Roles live on the user's profile document in Firestore; the storefront
//! reads them at sign-in, so a change applies from the user's next sign-in.

use thiserror::Error;

use prime_optic_core::{UserId, UserRole};
use prime_optic_storefront::backend::BackendError;
use prime_optic_storefront::config::ConfigError;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Firebase is not configured")]
    Unconfigured,

    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Set a user's role.
///
/// # Errors
///
/// Returns an error if Firebase is not configured or the write fails.
pub async fn set_role(uid: &str, role: UserRole) -> Result<(), AdminError> {
    let uid = uid.trim();
    if uid.is_empty() || uid.contains('/') {
        return Err(AdminError::InvalidUserId(uid.to_owned()));
    }

    let config = super::load_config()?;
    let backend = super::firebase_backend(&config).ok_or(AdminError::Unconfigured)?;

    let user_id = UserId::new(uid);
    backend.users.set_role(&user_id, role).await?;

    tracing::info!(user_id = %user_id, role = %role, "Role updated");
    Ok(())
}
