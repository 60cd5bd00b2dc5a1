//! Firebase REST client.
//!
//! # APIs
//!
//! - Firestore (`firestore.googleapis.com/v1`): documents are read with
//!   `:runQuery` and `GET`, written with `:commit` so `createdAt` and
//!   `updatedAt` get server timestamps, and removed with `DELETE`.
//! - Identity Toolkit (`identitytoolkit.googleapis.com/v1`): email and
//!   password sign-up and sign-in.
//!
//! Every request carries the web API key; Firestore requests also carry the
//! optional access token as a bearer token.

mod identity;
pub mod query;
mod repositories;
pub mod value;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::BackendError;
use crate::config::FirebaseConfig;

use query::{CommitRequest, RunQueryRequest, StructuredQuery, Write};
use value::decode_document;

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Client for Firestore and the Identity Toolkit.
///
/// Cheap to clone; implements every backend collaborator trait.
#[derive(Clone)]
pub struct FirebaseClient {
    inner: Arc<FirebaseClientInner>,
}

struct FirebaseClientInner {
    http: reqwest::Client,
    api_key: String,
    access_token: Option<String>,
    database: String,
}

impl FirebaseClient {
    /// Create a client for the configured project.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            inner: Arc::new(FirebaseClientInner {
                http: reqwest::Client::new(),
                api_key: config.api_key().to_string(),
                access_token: config
                    .access_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
                database: format!("projects/{}/databases/(default)", config.project_id),
            }),
        }
    }

    /// Resource name of a document.
    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/documents/{collection}/{id}", self.inner.database)
    }

    fn firestore_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{FIRESTORE_BASE_URL}/{path}?key={}", self.inner.api_key);
        let request = self.inner.http.request(method, url);
        match &self.inner.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a Firestore request and parse the JSON body.
    ///
    /// An empty success body parses as `null`.
    async fn send_firestore(&self, request: RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Firestore returned non-success status"
            );
            return Err(firestore_error(status, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Run a structured query and return the decoded documents.
    async fn run_query(&self, query: StructuredQuery) -> Result<Vec<Value>, BackendError> {
        let path = format!("{}/documents:runQuery", self.inner.database);
        let body = RunQueryRequest {
            structured_query: query,
        };
        let response = self
            .send_firestore(self.firestore_request(Method::POST, &path).json(&body))
            .await?;

        // One entry per result; an empty result is a single entry with only
        // `readTime`.
        let documents: Vec<Value> = response
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("document"))
                    .filter_map(decode_document)
                    .collect()
            })
            .unwrap_or_default();

        debug!(count = documents.len(), "Firestore query returned documents");
        Ok(documents)
    }

    /// Fetch one document, `None` if it does not exist.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, BackendError> {
        let path = self.document_name(collection, id);
        match self
            .send_firestore(self.firestore_request(Method::GET, &path))
            .await
        {
            Ok(document) => Ok(decode_document(&document)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Apply a single write atomically.
    async fn commit(&self, write: Write) -> Result<(), BackendError> {
        let path = format!("{}/documents:commit", self.inner.database);
        let body = CommitRequest {
            writes: vec![write],
        };
        self.send_firestore(self.firestore_request(Method::POST, &path).json(&body))
            .await?;
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        let path = self.document_name(collection, id);
        self.send_firestore(self.firestore_request(Method::DELETE, &path))
            .await?;
        Ok(())
    }

    /// Call an Identity Toolkit `accounts:*` method.
    async fn identity_call<B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<Value, BackendError> {
        let url = format!(
            "{IDENTITY_BASE_URL}/accounts:{method}?key={}",
            self.inner.api_key
        );
        let response = self
            .inner
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(identity::transport_error)?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(identity::identity_error(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Pull `(status, message)` out of a Google API error body.
fn error_details(text: &str) -> (Option<String>, String) {
    let parsed: Option<Value> = serde_json::from_str(text).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    let status = error
        .and_then(|e| e.get("status"))
        .and_then(Value::as_str)
        .map(String::from);
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map_or_else(|| text.chars().take(200).collect(), String::from);
    (status, message)
}

/// Map a Firestore error response onto the backend taxonomy.
fn firestore_error(status: StatusCode, text: &str) -> BackendError {
    let (code, message) = error_details(text);
    match code.as_deref() {
        Some("PERMISSION_DENIED" | "UNAUTHENTICATED") => BackendError::PermissionDenied(message),
        Some("NOT_FOUND") => BackendError::NotFound(message),
        Some("UNAVAILABLE" | "DEADLINE_EXCEEDED") => BackendError::Unavailable(message),
        _ => match status {
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                BackendError::PermissionDenied(message)
            }
            StatusCode::NOT_FOUND => BackendError::NotFound(message),
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                BackendError::Unavailable(message)
            }
            _ => BackendError::Api {
                status: status.as_u16(),
                message,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firestore_error_uses_status_code() {
        let body = r#"{"error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}}"#;
        let err = firestore_error(StatusCode::FORBIDDEN, body);
        assert!(matches!(err, BackendError::PermissionDenied(m) if m.contains("insufficient")));

        let body = r#"{"error": {"code": 503, "message": "backend down", "status": "UNAVAILABLE"}}"#;
        assert!(matches!(
            firestore_error(StatusCode::SERVICE_UNAVAILABLE, body),
            BackendError::Unavailable(_)
        ));

        let body = r#"{"error": {"code": 400, "message": "bad field", "status": "INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            firestore_error(StatusCode::BAD_REQUEST, body),
            BackendError::Api { status: 400, .. }
        ));
    }

    #[test]
    fn test_firestore_error_without_json_body() {
        let err = firestore_error(StatusCode::NOT_FOUND, "<html>gone</html>");
        assert!(matches!(err, BackendError::NotFound(m) if m == "<html>gone</html>"));
    }
}
