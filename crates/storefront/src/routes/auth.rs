//! Email and password authentication route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::checkout::CheckoutState;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::Notification;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: Option<CurrentUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

/// Store the user and forget a wizard prefilled for somebody else.
async fn start_session(session: &Session, user: &CurrentUser) -> Result<()> {
    session.cycle_id().await?;
    set_current_user(session, user).await?;
    session
        .remove::<CheckoutState>(session_keys::CHECKOUT)
        .await?;
    set_sentry_user(&user.id, Some(&user.email));
    Ok(())
}

#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SignUpRequest>,
) -> Result<Json<SessionView>> {
    let display_name = request
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let user = state
        .auth()
        .sign_up(&request.email, &request.password, display_name)
        .await?;
    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "Account created");

    Ok(Json(SessionView {
        user: Some(user),
        notification: Some(Notification::success("Account created successfully!")),
    }))
}

#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionView>> {
    let user = state
        .auth()
        .sign_in(&request.email, &request.password)
        .await?;
    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, admin = user.is_admin(), "Signed in");

    Ok(Json(SessionView {
        user: Some(user),
        notification: Some(Notification::success("Signed in successfully!")),
    }))
}

/// Sign out. The cart and favorites stay with the session.
pub async fn sign_out(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<SessionView>> {
    if let Some(user) = user {
        // Provider-side sign-out is best effort
        if let Err(e) = state.auth().sign_out(&user).await {
            tracing::warn!(user_id = %user.id, error = %e, "Provider sign-out failed");
        }
    }

    clear_current_user(&session).await?;
    session
        .remove::<CheckoutState>(session_keys::CHECKOUT)
        .await?;
    clear_sentry_user();

    Ok(Json(SessionView {
        user: None,
        notification: Some(Notification::info("Signed out.")),
    }))
}

/// The signed-in user, or `null`.
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<SessionView> {
    Json(SessionView {
        user,
        notification: None,
    })
}
