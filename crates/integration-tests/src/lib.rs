//! Integration tests for the Prime Optic storefront API.
//!
//! Each test starts the full router on an ephemeral port, backed by the
//! in-memory backend, session store and key-value store, and talks to it
//! over HTTP with a cookie-keeping client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p prime-optic-integration-tests
//! ```
//!
//! No database or Firebase project is needed.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tower_sessions::MemoryStore;

use prime_optic_core::{OrderId, Price, ProductId, UserId, UserRole};
use prime_optic_storefront::backend::memory::MemoryBackend;
use prime_optic_storefront::backend::unconfigured::Unconfigured;
use prime_optic_storefront::backend::{
    Backend, BackendError, OrderRepository, ProductRepository, UserDirectory,
};
use prime_optic_storefront::config::StorefrontConfig;
use prime_optic_storefront::models::{
    FrameMaterial, FrameShape, Gender, NewOrder, Order, ProductData, ProductType,
};
use prime_optic_storefront::state::AppState;
use prime_optic_storefront::stores::{KeyValueStore, MemoryKeyValueStore};

/// Password used by [`TestApp::sign_up`].
pub const PASSWORD: &str = "correct-horse";

/// A running storefront and a client with its own cookie jar.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    /// The in-memory collections behind the catalog, users and (unless
    /// replaced) orders.
    pub memory: Arc<MemoryBackend>,
    pub kv: Arc<MemoryKeyValueStore>,
}

/// Products the shop starts with, oldest first.
#[must_use]
pub fn sample_catalog() -> Vec<ProductData> {
    let mut aviator = ProductData::new(
        "rb-aviator",
        "Aviator Classic",
        "Ray-Ban",
        ProductType::Sunglasses,
        Price::from_units(50),
    );
    aviator.gender = Some(Gender::Men);
    aviator.frame_shape = Some(FrameShape::Round);
    aviator.frame_material = Some(FrameMaterial::Metal);
    aviator.rating = Some(4.8);

    let mut cat_eye = ProductData::new(
        "gg-cat-eye",
        "GG0516S",
        "Gucci",
        ProductType::Sunglasses,
        Price::from_units(320),
    );
    cat_eye.gender = Some(Gender::Women);
    cat_eye.frame_shape = Some(FrameShape::CatEye);
    cat_eye.frame_material = Some(FrameMaterial::Plastic);
    cat_eye.rating = Some(4.2);

    let mut wayfarer = ProductData::new(
        "rb-wayfarer",
        "Wayfarer",
        "Ray-Ban",
        ProductType::Sunglasses,
        Price::from_units(140),
    );
    wayfarer.frame_shape = Some(FrameShape::Square);
    wayfarer.frame_material = Some(FrameMaterial::Plastic);

    let mut optical = ProductData::new(
        "tf-5401",
        "FT5401",
        "Tom Ford",
        ProductType::Glasses,
        Price::from_units(210),
    );
    optical.gender = Some(Gender::Men);
    optical.frame_shape = Some(FrameShape::Square);
    optical.lens_width = Some(54.0);
    optical.bridge_width = Some(18.0);
    optical.temple_length = Some(145.0);

    vec![aviator, cat_eye, wayfarer, optical]
}

/// Order repository whose first `create` never completes, as when the
/// visitor's connection drops mid-submit. Later calls reach `inner`.
pub struct StallingOrders {
    inner: Arc<MemoryBackend>,
    calls: AtomicUsize,
}

impl StallingOrders {
    #[must_use]
    pub const fn new(inner: Arc<MemoryBackend>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl OrderRepository for StallingOrders {
    async fn create(&self, order: &NewOrder) -> Result<OrderId, BackendError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            std::future::pending::<()>().await;
        }
        OrderRepository::create(self.inner.as_ref(), order).await
    }

    async fn query_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, BackendError> {
        OrderRepository::query_by_user(self.inner.as_ref(), user_id).await
    }
}

impl TestApp {
    /// Storefront with the sample catalog.
    pub async fn spawn() -> Self {
        let memory = Arc::new(MemoryBackend::with_products(sample_catalog()));
        Self::spawn_with(memory.clone(), Backend::from_shared(memory)).await
    }

    /// Catalog and accounts work, but orders and bookings go to an
    /// unconfigured backend.
    pub async fn spawn_without_orders() -> Self {
        let memory = Arc::new(MemoryBackend::with_products(sample_catalog()));
        let mut backend = Backend::from_shared(memory.clone());
        backend.orders = Arc::new(Unconfigured);
        backend.appointments = Arc::new(Unconfigured);
        Self::spawn_with(memory, backend).await
    }

    /// Like [`TestApp::spawn`], but the first order submission hangs.
    pub async fn spawn_with_stalling_orders() -> Self {
        let memory = Arc::new(MemoryBackend::with_products(sample_catalog()));
        let mut backend = Backend::from_shared(memory.clone());
        backend.orders = Arc::new(StallingOrders::new(memory.clone()));
        Self::spawn_with(memory, backend).await
    }

    /// Storefront with no backend at all.
    pub async fn spawn_unconfigured() -> Self {
        Self::spawn_with(Arc::new(MemoryBackend::new()), Backend::unconfigured()).await
    }

    async fn spawn_with(memory: Arc<MemoryBackend>, backend: Backend) -> Self {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let state = AppState::new(
            StorefrontConfig::local(),
            backend,
            kv.clone() as Arc<dyn KeyValueStore>,
            None,
        );
        let app = prime_optic_storefront::app(state, MemoryStore::default());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: new_client(),
            memory,
            kv,
        }
    }

    /// A second visitor with an empty cookie jar.
    #[must_use]
    pub fn visitor(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: new_client(),
            memory: self.memory.clone(),
            kv: self.kv.clone(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        into_json(self.client.get(self.url(path)).send().await.unwrap()).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        into_json(self.client.post(self.url(path)).json(body).send().await.unwrap()).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        into_json(self.client.put(self.url(path)).json(body).send().await.unwrap()).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        into_json(self.client.delete(self.url(path)).send().await.unwrap()).await
    }

    /// Id of a catalog product by slug.
    pub async fn product_id(&self, slug: &str) -> ProductId {
        self.memory.fetch_by_slug(slug).await.unwrap().unwrap().id
    }

    /// Register and sign in; returns the new user's id.
    pub async fn sign_up(&self, email: &str, display_name: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/sign-up",
                &serde_json::json!({
                    "email": email,
                    "password": PASSWORD,
                    "displayName": display_name,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "sign-up failed: {body}");
        body["user"]["id"].as_str().unwrap().to_string()
    }

    pub async fn sign_in(&self, email: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/sign-in",
            &serde_json::json!({"email": email, "password": PASSWORD}),
        )
        .await
    }

    /// Register, grant the admin role and sign in again so the session
    /// picks it up.
    pub async fn sign_up_admin(&self, email: &str) -> String {
        let id = self.sign_up(email, "Admin").await;
        self.memory
            .set_role(&UserId::new(id.clone()), UserRole::Admin)
            .await
            .unwrap();
        let (status, _) = self.sign_in(email).await;
        assert_eq!(status, StatusCode::OK);
        id
    }
}

fn new_client() -> Client {
    Client::builder().cookie_store(true).build().unwrap()
}

async fn into_json(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = response.text().await.unwrap();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}
