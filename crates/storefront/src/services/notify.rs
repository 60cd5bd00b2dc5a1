//! User-facing notifications and readable error messages.

use serde::{Deserialize, Serialize};

use crate::backend::{AuthFailure, BackendError};

pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";
pub const PERMISSION_MESSAGE: &str = "You don't have permission to perform this action.";
pub const NOT_FOUND_MESSAGE: &str = "The requested item could not be found.";
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Messages at or above this length are replaced by [`GENERIC_MESSAGE`].
const MAX_PASSTHROUGH_LENGTH: usize = 100;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Error,
}

/// A transient message for the visitor (a toast, in the browser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

fn auth_message(failure: &AuthFailure) -> &'static str {
    match failure {
        AuthFailure::EmailAlreadyInUse => "An account with this email already exists.",
        AuthFailure::InvalidEmail => "Please enter a valid email address.",
        AuthFailure::WeakPassword => "Password should be at least 6 characters.",
        AuthFailure::UserNotFound => "No account found with this email.",
        AuthFailure::WrongPassword => "Incorrect password. Please try again.",
        AuthFailure::TooManyRequests => "Too many attempts. Please wait a moment and try again.",
        AuthFailure::NetworkRequestFailed => NETWORK_MESSAGE,
        AuthFailure::InvalidCredential => "Invalid email or password.",
        AuthFailure::Other(_) => "Authentication failed. Please try again.",
    }
}

/// Classify a free-form error message.
///
/// Network and permission wording map to their canned messages; anything
/// else short enough is assumed to be readable already.
#[must_use]
pub fn readable_text(message: &str) -> String {
    let lower = message.to_lowercase();
    if lower.contains("network") || lower.contains("fetch") || lower.contains("connection") {
        return NETWORK_MESSAGE.to_string();
    }
    if lower.contains("permission") || lower.contains("unauthorized") {
        return PERMISSION_MESSAGE.to_string();
    }
    if message.chars().count() < MAX_PASSTHROUGH_LENGTH {
        return message.to_string();
    }
    GENERIC_MESSAGE.to_string()
}

/// The message to show the visitor for a backend error.
#[must_use]
pub fn readable_message(err: &BackendError) -> String {
    match err {
        BackendError::Auth(failure) => auth_message(failure).to_string(),
        BackendError::PermissionDenied(_) => PERMISSION_MESSAGE.to_string(),
        BackendError::Unavailable(_) => NETWORK_MESSAGE.to_string(),
        BackendError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
        BackendError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
            NETWORK_MESSAGE.to_string()
        }
        other => readable_text(&other.to_string()),
    }
}
