//! Signed-in user types.

use serde::{Deserialize, Serialize};

use prime_optic_core::{UserId, UserRole};

/// Identity returned by the identity provider after sign-up or sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Profile document stored in the `users` collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

/// The user the session is signed in as.
///
/// Stored in the session; the role is resolved once at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl CurrentUser {
    /// Merge a fresh identity with its stored profile.
    ///
    /// The identity's email and display name win; the profile only
    /// contributes what the identity lacks, plus the role. A missing profile
    /// means role `user`.
    #[must_use]
    pub fn resolve(identity: Identity, profile: Option<UserProfile>) -> Self {
        let profile = profile.unwrap_or_default();
        let email = if identity.email.is_empty() {
            profile.email
        } else {
            identity.email
        };

        Self {
            id: identity.id,
            email,
            display_name: identity.display_name.or(profile.display_name),
            role: profile.role,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
