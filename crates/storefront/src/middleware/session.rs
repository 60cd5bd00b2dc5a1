//! Session middleware configuration.
//!
//! Sessions hold the signed-in user, the cart, the checkout wizard and the
//! anonymous device id. The store is `PostgreSQL` when a database is
//! configured and in-memory otherwise.

use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use uuid::Uuid;

use crate::config::StorefrontConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "po_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over `store`.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &StorefrontConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The visitor's anonymous device id, created on first use.
///
/// Owns the device's favorites, whether or not anyone is signed in.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn device_id(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(id) = session.get::<String>(session_keys::DEVICE_ID).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    session.insert(session_keys::DEVICE_ID, &id).await?;
    Ok(id)
}
