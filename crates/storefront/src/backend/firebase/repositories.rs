//! Firestore-backed repositories.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::instrument;
use uuid::Uuid;

use prime_optic_core::{
    AppointmentId, AppointmentStatus, OrderId, OrderStatus, ProductId, UserId, UserRole,
};

use super::FirebaseClient;
use super::query::{StructuredQuery, Write};
use super::value::encode_fields;
use crate::backend::{
    AppointmentRepository, BRAND_LISTING_LIMIT, BackendError, OrderRepository, ProductRepository,
    TYPE_LISTING_LIMIT, UserDirectory,
};
use crate::models::{
    Appointment, NewAppointment, NewOrder, Order, Product, ProductData, ProductType, UserProfile,
};

const PRODUCTS: &str = "products";
const ORDERS: &str = "orders";
const APPOINTMENTS: &str = "appointments";
const USERS: &str = "users";

/// Client-generated document id.
fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Serialize a model into encoded Firestore fields.
fn to_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>, BackendError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(encode_fields(&map)),
        other => Err(BackendError::Api {
            status: 0,
            message: format!("expected an object document, got {other}"),
        }),
    }
}

/// Deserialize decoded documents, skipping any that do not fit the model.
fn from_documents<T: DeserializeOwned>(collection: &str, documents: Vec<Value>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get("id").cloned();
            match serde_json::from_value(document) {
                Ok(model) => Some(model),
                Err(e) => {
                    tracing::warn!(collection, id = ?id, error = %e, "Skipping malformed document");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl ProductRepository for FirebaseClient {
    #[instrument(skip(self))]
    async fn fetch_by_type(&self, product_type: ProductType) -> Result<Vec<Product>, BackendError> {
        let query = StructuredQuery::collection(PRODUCTS)
            .where_eq("type", &json!(product_type.as_str()))
            .limit(TYPE_LISTING_LIMIT);
        Ok(from_documents(PRODUCTS, self.run_query(query).await?))
    }

    #[instrument(skip(self))]
    async fn fetch_by_brand_name(&self, brand_name: &str) -> Result<Vec<Product>, BackendError> {
        let types: Vec<Value> = ProductType::ALL
            .iter()
            .map(|t| json!(t.as_str()))
            .collect();
        let query = StructuredQuery::collection(PRODUCTS)
            .where_eq("brand", &json!(brand_name))
            .where_in("type", &types)
            .limit(BRAND_LISTING_LIMIT);
        Ok(from_documents(PRODUCTS, self.run_query(query).await?))
    }

    #[instrument(skip(self))]
    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<Product>, BackendError> {
        let query = StructuredQuery::collection(PRODUCTS)
            .where_eq("slug", &json!(slug))
            .limit(1);
        let products: Vec<Product> = from_documents(PRODUCTS, self.run_query(query).await?);
        Ok(products.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn fetch_by_id(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
        match self.get_document(PRODUCTS, id.as_str()).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Product>, BackendError> {
        let query = StructuredQuery::collection(PRODUCTS).order_by_desc("createdAt");
        Ok(from_documents(PRODUCTS, self.run_query(query).await?))
    }

    #[instrument(skip(self, product), fields(slug = %product.slug))]
    async fn create(&self, product: &ProductData) -> Result<ProductId, BackendError> {
        let id = new_document_id();
        let write = Write::create(self.document_name(PRODUCTS, &id), to_fields(product)?)
            .server_timestamp("createdAt")
            .server_timestamp("updatedAt");
        self.commit(write).await?;
        Ok(ProductId::new(id))
    }

    #[instrument(skip(self, product))]
    async fn update(&self, id: &ProductId, product: &ProductData) -> Result<(), BackendError> {
        let write = Write::update(self.document_name(PRODUCTS, id.as_str()), to_fields(product)?)
            .server_timestamp("updatedAt");
        self.commit(write).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ProductId) -> Result<(), BackendError> {
        self.delete_document(PRODUCTS, id.as_str()).await
    }
}

#[async_trait]
impl OrderRepository for FirebaseClient {
    #[instrument(skip(self, order))]
    async fn create(&self, order: &NewOrder) -> Result<OrderId, BackendError> {
        let id = new_document_id();
        let mut fields = to_fields(order)?;
        fields.extend(to_fields(&json!({ "status": OrderStatus::Pending }))?);
        let write = Write::create(self.document_name(ORDERS, &id), fields)
            .server_timestamp("createdAt");
        self.commit(write).await?;
        Ok(OrderId::new(id))
    }

    #[instrument(skip(self))]
    async fn query_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, BackendError> {
        let query = StructuredQuery::collection(ORDERS)
            .where_eq("userId", &json!(user_id.as_str()))
            .order_by_desc("createdAt");
        Ok(from_documents(ORDERS, self.run_query(query).await?))
    }
}

#[async_trait]
impl AppointmentRepository for FirebaseClient {
    #[instrument(skip(self, appointment))]
    async fn create(&self, appointment: &NewAppointment) -> Result<AppointmentId, BackendError> {
        let id = new_document_id();
        let mut fields = to_fields(appointment)?;
        fields.extend(to_fields(&json!({ "status": AppointmentStatus::Pending }))?);
        let write = Write::create(self.document_name(APPOINTMENTS, &id), fields)
            .server_timestamp("createdAt");
        self.commit(write).await?;
        Ok(AppointmentId::new(id))
    }

    #[instrument(skip(self))]
    async fn query_by_user(&self, user_id: &UserId) -> Result<Vec<Appointment>, BackendError> {
        let query = StructuredQuery::collection(APPOINTMENTS)
            .where_eq("userId", &json!(user_id.as_str()));
        Ok(from_documents(APPOINTMENTS, self.run_query(query).await?))
    }
}

#[async_trait]
impl UserDirectory for FirebaseClient {
    #[instrument(skip(self))]
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, BackendError> {
        match self.get_document(USERS, user_id.as_str()).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, profile))]
    async fn create_profile(
        &self,
        user_id: &UserId,
        profile: &UserProfile,
    ) -> Result<(), BackendError> {
        let fields = to_fields(&json!({
            "email": profile.email,
            "role": profile.role,
            "displayName": profile.display_name,
        }))?;
        let write = Write::set(self.document_name(USERS, user_id.as_str()), fields)
            .server_timestamp("createdAt")
            .server_timestamp("updatedAt");
        self.commit(write).await
    }

    #[instrument(skip(self))]
    async fn set_role(&self, user_id: &UserId, role: UserRole) -> Result<(), BackendError> {
        let fields = to_fields(&json!({ "role": role }))?;
        let write = Write::merge(self.document_name(USERS, user_id.as_str()), fields)
            .server_timestamp("updatedAt");
        self.commit(write).await
    }
}
