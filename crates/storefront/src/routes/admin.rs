//! Admin product management. Every handler requires the `admin` role.
//!
//! Writes invalidate the catalog cache so listings pick them up at once.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use prime_optic_core::{Price, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductData};
use crate::services::Notification;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProductSaved {
    pub id: ProductId,
    pub notification: Notification,
}

/// Reject products the storefront cannot list.
fn validate(product: &ProductData) -> Result<()> {
    for (field, value) in [
        ("name", &product.name),
        ("slug", &product.slug),
        ("brand", &product.brand),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("Product {field} is required.")));
        }
    }
    if product.price < Price::ZERO {
        return Err(AppError::BadRequest("Price cannot be negative.".to_string()));
    }
    Ok(())
}

/// Every product, newest first. Bypasses the listing cache.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.backend().products.fetch_all().await?))
}

#[instrument(skip(state, admin, product), fields(admin_id = %admin.id, slug = %product.slug))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(product): Json<ProductData>,
) -> Result<(StatusCode, Json<ProductSaved>)> {
    validate(&product)?;
    let id = state.backend().products.create(&product).await?;
    state.catalog().invalidate();

    add_breadcrumb("admin", "Created product", Some(&[("product_id", id.as_str())]));
    tracing::info!(product_id = %id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductSaved {
            notification: Notification::success(format!("{} created", product.name)),
            id,
        }),
    ))
}

#[instrument(skip(state, admin, product), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(product): Json<ProductData>,
) -> Result<Json<ProductSaved>> {
    validate(&product)?;
    let id = ProductId::new(id);
    state.backend().products.update(&id, &product).await?;
    state.catalog().invalidate();

    tracing::info!(product_id = %id, "Product updated");
    Ok(Json(ProductSaved {
        notification: Notification::success(format!("{} updated", product.name)),
        id,
    }))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = ProductId::new(id);
    state.backend().products.delete(&id).await?;
    state.catalog().invalidate();

    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
