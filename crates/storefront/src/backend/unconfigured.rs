//! Stand-in used when the Firebase configuration is incomplete.
//!
//! Catalog and history reads degrade to empty results so pages still render;
//! every write fails with a message the visitor can act on.

use async_trait::async_trait;

use prime_optic_core::{AppointmentId, OrderId, ProductId, UserId, UserRole};

use super::{
    AppointmentRepository, BackendError, IdentityProvider, OrderRepository, ProductRepository,
    UserDirectory,
};
use crate::models::{
    Appointment, Identity, NewAppointment, NewOrder, Order, Product, ProductData, ProductType,
    UserProfile,
};

pub const ORDERS_UNAVAILABLE: &str = "Order system is temporarily unavailable. Please try again later or contact the store by phone.";
pub const BOOKING_UNAVAILABLE: &str = "Appointment booking is temporarily unavailable. Please try again later.";
pub const ACCOUNTS_UNAVAILABLE: &str = "Sign-in is temporarily unavailable. Please try again later.";
pub const CATALOG_UNAVAILABLE: &str = "Catalog editing is temporarily unavailable.";

fn unavailable(message: &str) -> BackendError {
    tracing::warn!("Backend is not configured; rejecting write");
    BackendError::Unconfigured(message.to_string())
}

/// Backend with nothing behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

#[async_trait]
impl ProductRepository for Unconfigured {
    async fn fetch_by_type(&self, _product_type: ProductType) -> Result<Vec<Product>, BackendError> {
        Ok(Vec::new())
    }

    async fn fetch_by_brand_name(&self, _brand_name: &str) -> Result<Vec<Product>, BackendError> {
        Ok(Vec::new())
    }

    async fn fetch_by_slug(&self, _slug: &str) -> Result<Option<Product>, BackendError> {
        Ok(None)
    }

    async fn fetch_by_id(&self, _id: &ProductId) -> Result<Option<Product>, BackendError> {
        Ok(None)
    }

    async fn fetch_all(&self) -> Result<Vec<Product>, BackendError> {
        Ok(Vec::new())
    }

    async fn create(&self, _product: &ProductData) -> Result<ProductId, BackendError> {
        Err(unavailable(CATALOG_UNAVAILABLE))
    }

    async fn update(&self, _id: &ProductId, _product: &ProductData) -> Result<(), BackendError> {
        Err(unavailable(CATALOG_UNAVAILABLE))
    }

    async fn delete(&self, _id: &ProductId) -> Result<(), BackendError> {
        Err(unavailable(CATALOG_UNAVAILABLE))
    }
}

#[async_trait]
impl OrderRepository for Unconfigured {
    async fn create(&self, _order: &NewOrder) -> Result<OrderId, BackendError> {
        Err(unavailable(ORDERS_UNAVAILABLE))
    }

    async fn query_by_user(&self, _user_id: &UserId) -> Result<Vec<Order>, BackendError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl AppointmentRepository for Unconfigured {
    async fn create(&self, _appointment: &NewAppointment) -> Result<AppointmentId, BackendError> {
        Err(unavailable(BOOKING_UNAVAILABLE))
    }

    async fn query_by_user(&self, _user_id: &UserId) -> Result<Vec<Appointment>, BackendError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl IdentityProvider for Unconfigured {
    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _display_name: Option<&str>,
    ) -> Result<Identity, BackendError> {
        Err(unavailable(ACCOUNTS_UNAVAILABLE))
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity, BackendError> {
        Err(unavailable(ACCOUNTS_UNAVAILABLE))
    }

    async fn sign_out(&self, _user_id: &UserId) -> Result<(), BackendError> {
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for Unconfigured {
    async fn fetch_profile(&self, _user_id: &UserId) -> Result<Option<UserProfile>, BackendError> {
        Ok(None)
    }

    async fn create_profile(
        &self,
        _user_id: &UserId,
        _profile: &UserProfile,
    ) -> Result<(), BackendError> {
        Err(unavailable(ACCOUNTS_UNAVAILABLE))
    }

    async fn set_role(&self, _user_id: &UserId, _role: UserRole) -> Result<(), BackendError> {
        Err(unavailable(ACCOUNTS_UNAVAILABLE))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_degrade_to_empty() {
        let backend = Unconfigured;
        assert!(backend.fetch_by_type(ProductType::Glasses).await.unwrap().is_empty());
        assert!(backend.fetch_by_slug("any").await.unwrap().is_none());
        assert!(
            OrderRepository::query_by_user(&backend, &UserId::new("u1"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_writes_report_unavailable() {
        let backend = Unconfigured;
        let product = ProductData::new("s", "n", "b", ProductType::Glasses, prime_optic_core::Price::ZERO);
        let err = ProductRepository::create(&backend, &product)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Unconfigured(_)));
        assert!(ORDERS_UNAVAILABLE.len() < 100);
    }
}
