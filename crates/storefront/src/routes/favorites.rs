//! Favorites route handlers.
//!
//! Favorites belong to the device: they are keyed by the session's anonymous
//! device id, which survives sign-in and sign-out.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use prime_optic_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::device_id;
use crate::models::Product;
use crate::services::Notification;
use crate::state::AppState;
use crate::stores::FavoritesStore;

async fn load_favorites(state: &AppState, session: &Session) -> Result<FavoritesStore> {
    let owner = device_id(session).await?;
    Ok(FavoritesStore::load(state.kv(), &owner).await?)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesView {
    pub favorites: Vec<Product>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl FavoritesView {
    fn new(store: &FavoritesStore) -> Self {
        Self {
            favorites: store.favorites().to_vec(),
            count: store.favorites_count(),
            notification: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<FavoritesView>> {
    let store = load_favorites(&state, &session).await?;
    Ok(Json(FavoritesView::new(&store)))
}

/// Save a snapshot of the product as it is now.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Json<FavoritesView>> {
    let product = state
        .backend()
        .products
        .fetch_by_id(&ProductId::new(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let mut store = load_favorites(&state, &session).await?;
    let name = product.name.clone();
    store.add_to_favorites(product).await?;

    let mut view = FavoritesView::new(&store);
    view.notification = Some(Notification::success(format!("{name} saved to favorites")));
    Ok(Json(view))
}

#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Json<FavoritesView>> {
    let mut store = load_favorites(&state, &session).await?;
    store
        .remove_from_favorites(&ProductId::new(product_id))
        .await?;
    Ok(Json(FavoritesView::new(&store)))
}

pub async fn clear(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<FavoritesView>> {
    let mut store = load_favorites(&state, &session).await?;
    store.clear_favorites().await?;
    Ok(Json(FavoritesView::new(&store)))
}

/// Whether one product is saved.
pub async fn status(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Json<FavoriteStatus>> {
    let store = load_favorites(&state, &session).await?;
    Ok(Json(FavoriteStatus {
        is_favorite: store.is_favorite(&ProductId::new(product_id)),
    }))
}
