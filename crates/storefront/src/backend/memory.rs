//! In-process backend for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use prime_optic_core::{
    AppointmentId, AppointmentStatus, OrderId, OrderStatus, ProductId, UserId, UserRole,
};

use super::{
    AppointmentRepository, AuthFailure, BackendError, IdentityProvider, OrderRepository,
    ProductRepository, UserDirectory, BRAND_LISTING_LIMIT, TYPE_LISTING_LIMIT,
};
use crate::models::{
    Appointment, Identity, NewAppointment, NewOrder, Order, Product, ProductData, ProductType,
    UserProfile,
};

/// Minimum password length accepted at sign-up.
const MIN_PASSWORD_LENGTH: usize = 6;

/// A stored document plus its insertion sequence, used for "newest first".
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    created_at: DateTime<Utc>,
    value: T,
}

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    password: String,
    display_name: Option<String>,
}

#[derive(Debug, Default)]
struct Collections {
    seq: u64,
    products: HashMap<ProductId, Stored<ProductData>>,
    orders: HashMap<OrderId, Stored<NewOrder>>,
    appointments: HashMap<AppointmentId, Stored<NewAppointment>>,
    accounts: HashMap<String, Account>,
    profiles: HashMap<UserId, UserProfile>,
}

impl Collections {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn stamp<T>(&mut self, value: T) -> Stored<T> {
        Stored {
            seq: self.next_seq(),
            created_at: Utc::now(),
            value,
        }
    }
}

fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn newest_first<K: Clone, T: Clone>(entries: impl Iterator<Item = (K, Stored<T>)>) -> Vec<(K, Stored<T>)> {
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by(|a, b| b.1.seq.cmp(&a.1.seq));
    entries
}

/// Backend that keeps every collection in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<Collections>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a catalog, inserted in order (the last one is newest).
    #[must_use]
    pub fn with_products(products: Vec<ProductData>) -> Self {
        let mut collections = Collections::default();
        for product in products {
            let stored = collections.stamp(product);
            collections
                .products
                .insert(ProductId::new(new_document_id()), stored);
        }
        Self {
            data: RwLock::new(collections),
        }
    }

    /// Number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.data.read().await.orders.len()
    }

    fn to_product(id: &ProductId, stored: &Stored<ProductData>) -> Product {
        stored.value.clone().with_id(id.clone())
    }
}

#[async_trait]
impl ProductRepository for MemoryBackend {
    async fn fetch_by_type(&self, product_type: ProductType) -> Result<Vec<Product>, BackendError> {
        let data = self.data.read().await;
        let mut products: Vec<_> = data
            .products
            .iter()
            .filter(|(_, stored)| stored.value.product_type == product_type)
            .map(|(id, stored)| (stored.seq, Self::to_product(id, stored)))
            .collect();
        products.sort_by_key(|(seq, _)| *seq);
        Ok(products
            .into_iter()
            .map(|(_, product)| product)
            .take(TYPE_LISTING_LIMIT as usize)
            .collect())
    }

    async fn fetch_by_brand_name(&self, brand_name: &str) -> Result<Vec<Product>, BackendError> {
        let data = self.data.read().await;
        let mut products: Vec<_> = data
            .products
            .iter()
            .filter(|(_, stored)| stored.value.brand == brand_name)
            .map(|(id, stored)| (stored.seq, Self::to_product(id, stored)))
            .collect();
        products.sort_by_key(|(seq, _)| *seq);
        Ok(products
            .into_iter()
            .map(|(_, product)| product)
            .take(BRAND_LISTING_LIMIT as usize)
            .collect())
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<Product>, BackendError> {
        let data = self.data.read().await;
        Ok(data
            .products
            .iter()
            .filter(|(_, stored)| stored.value.slug == slug)
            .min_by_key(|(_, stored)| stored.seq)
            .map(|(id, stored)| Self::to_product(id, stored)))
    }

    async fn fetch_by_id(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
        let data = self.data.read().await;
        Ok(data
            .products
            .get(id)
            .map(|stored| Self::to_product(id, stored)))
    }

    async fn fetch_all(&self) -> Result<Vec<Product>, BackendError> {
        let data = self.data.read().await;
        let entries = newest_first(
            data.products
                .iter()
                .map(|(id, stored)| (id.clone(), stored.clone())),
        );
        Ok(entries
            .iter()
            .map(|(id, stored)| Self::to_product(id, stored))
            .collect())
    }

    async fn create(&self, product: &ProductData) -> Result<ProductId, BackendError> {
        let mut data = self.data.write().await;
        let id = ProductId::new(new_document_id());
        let stored = data.stamp(product.clone());
        data.products.insert(id.clone(), stored);
        Ok(id)
    }

    async fn update(&self, id: &ProductId, product: &ProductData) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        let stored = data
            .products
            .get_mut(id)
            .ok_or_else(|| BackendError::NotFound(format!("products/{id}")))?;
        stored.value = product.clone();
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), BackendError> {
        self.data.write().await.products.remove(id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryBackend {
    async fn create(&self, order: &NewOrder) -> Result<OrderId, BackendError> {
        let mut data = self.data.write().await;
        let id = OrderId::new(new_document_id());
        let stored = data.stamp(order.clone());
        data.orders.insert(id.clone(), stored);
        Ok(id)
    }

    async fn query_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, BackendError> {
        let data = self.data.read().await;
        let entries = newest_first(
            data.orders
                .iter()
                .filter(|(_, stored)| stored.value.user_id.as_ref() == Some(user_id))
                .map(|(id, stored)| (id.clone(), stored.clone())),
        );
        Ok(entries
            .into_iter()
            .map(|(id, stored)| Order {
                id,
                details: stored.value,
                status: OrderStatus::Pending,
                created_at: Some(stored.created_at),
                updated_at: None,
            })
            .collect())
    }
}

#[async_trait]
impl AppointmentRepository for MemoryBackend {
    async fn create(&self, appointment: &NewAppointment) -> Result<AppointmentId, BackendError> {
        let mut data = self.data.write().await;
        let id = AppointmentId::new(new_document_id());
        let stored = data.stamp(appointment.clone());
        data.appointments.insert(id.clone(), stored);
        Ok(id)
    }

    async fn query_by_user(&self, user_id: &UserId) -> Result<Vec<Appointment>, BackendError> {
        let data = self.data.read().await;
        let entries = newest_first(
            data.appointments
                .iter()
                .filter(|(_, stored)| stored.value.user_id.as_ref() == Some(user_id))
                .map(|(id, stored)| (id.clone(), stored.clone())),
        );
        Ok(entries
            .into_iter()
            .map(|(id, stored)| Appointment {
                id,
                details: stored.value,
                status: AppointmentStatus::Pending,
                created_at: Some(stored.created_at),
            })
            .collect())
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, BackendError> {
        let email = email.trim().to_lowercase();
        if prime_optic_core::Email::parse(&email).is_err() {
            return Err(AuthFailure::InvalidEmail.into());
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthFailure::WeakPassword.into());
        }

        let mut data = self.data.write().await;
        if data.accounts.contains_key(&email) {
            return Err(AuthFailure::EmailAlreadyInUse.into());
        }

        let account = Account {
            id: UserId::new(new_document_id()),
            password: password.to_string(),
            display_name: display_name.map(String::from),
        };
        let identity = Identity {
            id: account.id.clone(),
            email: email.clone(),
            display_name: account.display_name.clone(),
        };
        data.accounts.insert(email, account);
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, BackendError> {
        let email = email.trim().to_lowercase();
        let data = self.data.read().await;
        let account = data.accounts.get(&email).ok_or(AuthFailure::UserNotFound)?;
        if account.password != password {
            return Err(AuthFailure::WrongPassword.into());
        }
        Ok(Identity {
            id: account.id.clone(),
            email,
            display_name: account.display_name.clone(),
        })
    }

    async fn sign_out(&self, _user_id: &UserId) -> Result<(), BackendError> {
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryBackend {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, BackendError> {
        Ok(self.data.read().await.profiles.get(user_id).cloned())
    }

    async fn create_profile(
        &self,
        user_id: &UserId,
        profile: &UserProfile,
    ) -> Result<(), BackendError> {
        self.data
            .write()
            .await
            .profiles
            .insert(user_id.clone(), profile.clone());
        Ok(())
    }

    async fn set_role(&self, user_id: &UserId, role: UserRole) -> Result<(), BackendError> {
        self.data
            .write()
            .await
            .profiles
            .entry(user_id.clone())
            .or_default()
            .role = role;
        Ok(())
    }
}
