//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. The response body is always a
//! notification the client shows as an error toast:
//!
//! ```json
//! {"notification": {"level": "error", "message": "..."}}
//! ```
//!
//! Server-side failures are captured to Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::backend::{AuthFailure, BackendError};
use crate::checkout::CheckoutError;
use crate::services::appointments::BookingError;
use crate::services::notify::{GENERIC_MESSAGE, Notification, readable_message};
use crate::stores::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend collaborator failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Checkout wizard refused a transition.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Booking form is incomplete or invalid.
    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    /// Key-value persistence failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

const fn auth_status(failure: &AuthFailure) -> StatusCode {
    match failure {
        AuthFailure::EmailAlreadyInUse => StatusCode::CONFLICT,
        AuthFailure::InvalidEmail | AuthFailure::WeakPassword | AuthFailure::Other(_) => {
            StatusCode::BAD_REQUEST
        }
        AuthFailure::UserNotFound | AuthFailure::WrongPassword | AuthFailure::InvalidCredential => {
            StatusCode::UNAUTHORIZED
        }
        AuthFailure::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        AuthFailure::NetworkRequestFailed => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Backend(err) => match err {
                BackendError::Auth(failure) => auth_status(failure),
                BackendError::Unconfigured(_) | BackendError::Unavailable(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                BackendError::NotFound(_) => StatusCode::NOT_FOUND,
                BackendError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                BackendError::Http(_) | BackendError::Parse(_) | BackendError::Api { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Checkout(CheckoutError::AlreadySubmitting) => StatusCode::CONFLICT,
            Self::Checkout(_) | Self::Booking(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Text shown to the visitor. Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(err) => readable_message(err),
            Self::Checkout(err) => err.to_string(),
            Self::Booking(err) => err.to_string(),
            Self::Store(_) | Self::Session(_) | Self::Internal(_) => GENERIC_MESSAGE.to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Session(_)
                | Self::Internal(_)
                | Self::Backend(
                    BackendError::Http(_) | BackendError::Parse(_) | BackendError::Api { .. }
                )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = json!({ "notification": Notification::error(self.user_message()) });
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after sign-in to associate errors with the user.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on sign-out.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a cart or checkout action.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
