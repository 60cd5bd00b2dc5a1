//! Identity Toolkit: email and password accounts.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use prime_optic_core::UserId;

use super::{FirebaseClient, error_details};
use crate::backend::{AuthFailure, BackendError, IdentityProvider};
use crate::models::Identity;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl AccountResponse {
    fn into_identity(self) -> Identity {
        Identity {
            id: UserId::new(self.local_id),
            email: self.email,
            display_name: self.display_name.filter(|name| !name.is_empty()),
        }
    }
}

/// Connection failures surface as a network auth failure.
pub(super) fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_connect() || err.is_timeout() {
        BackendError::Auth(AuthFailure::NetworkRequestFailed)
    } else {
        BackendError::Http(err)
    }
}

/// Map an Identity Toolkit error body onto [`AuthFailure`].
///
/// The error message starts with a code such as `EMAIL_EXISTS`, optionally
/// followed by ` : detail`.
pub(super) fn identity_error(status: StatusCode, text: &str) -> BackendError {
    let (_, message) = error_details(text);
    let code = message
        .split(" : ")
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    let failure = match code.as_str() {
        "EMAIL_EXISTS" => AuthFailure::EmailAlreadyInUse,
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthFailure::InvalidEmail,
        "WEAK_PASSWORD" => AuthFailure::WeakPassword,
        "EMAIL_NOT_FOUND" => AuthFailure::UserNotFound,
        "INVALID_PASSWORD" => AuthFailure::WrongPassword,
        "INVALID_LOGIN_CREDENTIALS" => AuthFailure::InvalidCredential,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthFailure::TooManyRequests,
        _ if status.is_server_error() => {
            return BackendError::Unavailable(message);
        }
        _ => AuthFailure::Other(code),
    };
    BackendError::Auth(failure)
}

#[async_trait]
impl IdentityProvider for FirebaseClient {
    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, BackendError> {
        let response = self
            .identity_call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        let mut account: AccountResponse = serde_json::from_value(response)?;

        if let (Some(name), Some(token)) = (display_name, account.id_token.as_deref()) {
            self.identity_call(
                "update",
                &UpdateProfileRequest {
                    id_token: token,
                    display_name: name,
                    return_secure_token: false,
                },
            )
            .await?;
            account.display_name = Some(name.to_string());
        }

        tracing::info!(user_id = %account.local_id, "Account created");
        Ok(account.into_identity())
    }

    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, BackendError> {
        let response = self
            .identity_call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        let account: AccountResponse = serde_json::from_value(response)?;
        Ok(account.into_identity())
    }

    async fn sign_out(&self, user_id: &UserId) -> Result<(), BackendError> {
        // ID tokens are not kept server-side, so there is nothing to revoke.
        tracing::debug!(%user_id, "Signed out");
        Ok(())
    }
}
