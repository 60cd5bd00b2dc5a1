//! Backend collaborators: product, order and appointment repositories, the
//! identity provider and the user directory.
//!
//! # Implementations
//!
//! - [`firebase::FirebaseClient`] talks to Firestore and the Identity Toolkit
//!   over REST. Used when the Firebase configuration is complete.
//! - [`unconfigured::Unconfigured`] stands in when it is not: reads come back
//!   empty, writes fail with [`BackendError::Unconfigured`].
//! - [`memory::MemoryBackend`] keeps everything in process, for tests and
//!   local development.
//!
//! Handlers never talk to an implementation directly; they go through the
//! trait objects bundled in [`Backend`].

pub mod firebase;
pub mod memory;
pub mod unconfigured;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use prime_optic_core::{AppointmentId, OrderId, ProductId, UserId, UserRole};

use crate::catalog::brands::brand_name_for_slug;
use crate::config::FirebaseConfig;
use crate::models::{
    Appointment, Identity, NewAppointment, NewOrder, Order, Product, ProductData, ProductType,
    UserProfile,
};

/// Page size for a product-type listing.
pub const TYPE_LISTING_LIMIT: u32 = 24;

/// Page size for a brand listing.
pub const BRAND_LISTING_LIMIT: u32 = 48;

/// Errors raised by backend collaborators.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No backend is configured; the message is shown to the user as is.
    #[error("{0}")]
    Unconfigured(String),

    /// Document not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Backend temporarily unreachable or timed out.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Identity provider rejected the request.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthFailure),

    /// Any other non-success response.
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Identity provider failure codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("email already in use")]
    EmailAlreadyInUse,
    #[error("invalid email")]
    InvalidEmail,
    #[error("weak password")]
    WeakPassword,
    #[error("user not found")]
    UserNotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("too many requests")]
    TooManyRequests,
    #[error("network request failed")]
    NetworkRequestFailed,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("{0}")]
    Other(String),
}

/// Read and write access to the product catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products of one type, at most [`TYPE_LISTING_LIMIT`].
    async fn fetch_by_type(&self, product_type: ProductType) -> Result<Vec<Product>, BackendError>;

    /// Glasses and sunglasses whose `brand` equals `brand_name`, at most
    /// [`BRAND_LISTING_LIMIT`].
    async fn fetch_by_brand_name(&self, brand_name: &str) -> Result<Vec<Product>, BackendError>;

    /// Products of a featured brand, looked up by slug.
    ///
    /// An unknown slug yields an empty list without a backend call.
    async fn fetch_by_brand(&self, brand_slug: &str) -> Result<Vec<Product>, BackendError> {
        match brand_name_for_slug(brand_slug) {
            Some(name) => self.fetch_by_brand_name(name).await,
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<Product>, BackendError>;

    async fn fetch_by_id(&self, id: &ProductId) -> Result<Option<Product>, BackendError>;

    /// Every product, newest first.
    async fn fetch_all(&self) -> Result<Vec<Product>, BackendError>;

    /// Store a new product, stamping `createdAt` and `updatedAt`.
    async fn create(&self, product: &ProductData) -> Result<ProductId, BackendError>;

    /// Overwrite an existing product's fields, stamping `updatedAt`.
    async fn update(&self, id: &ProductId, product: &ProductData) -> Result<(), BackendError>;

    async fn delete(&self, id: &ProductId) -> Result<(), BackendError>;
}

/// Order storage.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store an order with status `pending` and a server timestamp.
    async fn create(&self, order: &NewOrder) -> Result<OrderId, BackendError>;

    /// A user's orders, newest first.
    async fn query_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, BackendError>;
}

/// Eye exam appointment storage.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Store an appointment with status `pending` and a server timestamp.
    async fn create(&self, appointment: &NewAppointment) -> Result<AppointmentId, BackendError>;

    async fn query_by_user(&self, user_id: &UserId) -> Result<Vec<Appointment>, BackendError>;
}

/// Email and password authentication.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account, setting the display name when given.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, BackendError>;

    /// End the provider-side session, if the provider keeps one.
    async fn sign_out(&self, user_id: &UserId) -> Result<(), BackendError>;
}

/// User profile documents (the `users` collection).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, BackendError>;

    /// Create the profile document written at sign-up.
    async fn create_profile(
        &self,
        user_id: &UserId,
        profile: &UserProfile,
    ) -> Result<(), BackendError>;

    /// Merge a new role into the profile, creating it if absent.
    async fn set_role(&self, user_id: &UserId, role: UserRole) -> Result<(), BackendError>;
}

/// All collaborators, as shared trait objects.
#[derive(Clone)]
pub struct Backend {
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserDirectory>,
}

impl Backend {
    /// Use one implementation for every collaborator.
    pub fn from_shared<T>(backend: Arc<T>) -> Self
    where
        T: ProductRepository
            + OrderRepository
            + AppointmentRepository
            + IdentityProvider
            + UserDirectory
            + 'static,
    {
        Self {
            products: backend.clone(),
            orders: backend.clone(),
            appointments: backend.clone(),
            identity: backend.clone(),
            users: backend,
        }
    }

    /// Backend used when Firebase is not configured.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::from_shared(Arc::new(unconfigured::Unconfigured))
    }

    /// Firebase when configured, otherwise the degraded backend.
    #[must_use]
    pub fn from_config(firebase: Option<&FirebaseConfig>) -> Self {
        match firebase {
            Some(config) => Self::from_shared(Arc::new(firebase::FirebaseClient::new(config))),
            None => {
                tracing::warn!("Firebase is not configured; catalog is empty and orders are disabled");
                Self::unconfigured()
            }
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use prime_optic_core::Price;

    #[tokio::test]
    async fn test_fetch_by_brand_resolves_slug() {
        let memory = MemoryBackend::with_products(vec![
            ProductData::new("tf-1", "FT5401", "Tom Ford", ProductType::Glasses, Price::from_units(210)),
            ProductData::new("rb-1", "Wayfarer", "Ray-Ban", ProductType::Sunglasses, Price::from_units(150)),
        ]);

        let products = memory.fetch_by_brand("TOM-FORD").await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].brand, "Tom Ford");

        assert!(memory.fetch_by_brand("unknown").await.unwrap().is_empty());
    }
}
