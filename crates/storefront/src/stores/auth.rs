//! Sign-up, sign-in and role resolution.
//!
//! The identity provider owns accounts; the user directory owns roles. This
//! store combines the two into the [`CurrentUser`] kept in the session.

use std::sync::Arc;

use tracing::instrument;

use prime_optic_core::UserRole;

use crate::backend::{Backend, BackendError, IdentityProvider, UserDirectory};
use crate::models::{CurrentUser, Identity, UserProfile};

#[derive(Clone)]
pub struct AuthStore {
    identity: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore").finish_non_exhaustive()
    }
}

impl AuthStore {
    #[must_use]
    pub fn new(backend: &Backend) -> Self {
        Self {
            identity: backend.identity.clone(),
            users: backend.users.clone(),
        }
    }

    /// Attach the stored role to a fresh identity.
    ///
    /// A failed lookup is logged and treated as a missing profile, so the
    /// user is signed in with role `user`.
    pub async fn resolve_user(&self, identity: Identity) -> CurrentUser {
        let profile = match self.users.fetch_profile(&identity.id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(user_id = %identity.id, error = %e, "Role lookup failed, defaulting to user");
                None
            }
        };
        CurrentUser::resolve(identity, profile)
    }

    /// Create an account and its profile document.
    ///
    /// The profile write is best effort: if it fails the account still
    /// exists and the user is signed in with role `user`.
    ///
    /// # Errors
    ///
    /// Returns the identity provider's error if the account is rejected.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<CurrentUser, BackendError> {
        let identity = self.identity.sign_up(email, password, display_name).await?;

        let profile = UserProfile {
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            role: UserRole::User,
        };
        if let Err(e) = self.users.create_profile(&identity.id, &profile).await {
            tracing::warn!(user_id = %identity.id, error = %e, "Failed to create user profile");
        }

        Ok(CurrentUser::resolve(identity, Some(profile)))
    }

    /// # Errors
    ///
    /// Returns the identity provider's error for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<CurrentUser, BackendError> {
        let identity = self.identity.sign_in(email, password).await?;
        Ok(self.resolve_user(identity).await)
    }

    /// # Errors
    ///
    /// Returns an error if the provider fails to end its session.
    pub async fn sign_out(&self, user: &CurrentUser) -> Result<(), BackendError> {
        self.identity.sign_out(&user.id).await
    }
}
