//! Cart route handlers.
//!
//! The cart lives in the session under [`session_keys::CART`]. Lines are
//! addressed by product id plus the blue-light-filter choice.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use prime_optic_core::{Price, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::services::Notification;
use crate::state::AppState;
use crate::stores::{Cart, CartLineItem, LineKey};

/// Read the session's cart, empty if none.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// `p1` or `p1-bluefilter`.
    pub key: String,
    #[serde(flatten)]
    pub item: CartLineItem,
    pub line_total: Price,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: Price,
    pub item_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl CartView {
    fn new(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartLineView {
                    key: item.key().to_string(),
                    line_total: item.line_total(),
                    item: item.clone(),
                })
                .collect(),
            subtotal: cart.subtotal(),
            item_count: cart.item_count(),
            notification: None,
        }
    }

    fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: Option<i64>,
    #[serde(default)]
    pub add_blue_light_filter: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
    #[serde(default)]
    pub add_blue_light_filter: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineParams {
    #[serde(default)]
    pub add_blue_light_filter: bool,
}

/// Quantities below 1 become 1.
fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::new(&cart)))
}

/// Add a product, merging with an existing line for the same key.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .backend()
        .products
        .fetch_by_id(&request.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let quantity = clamp_quantity(request.quantity.unwrap_or(1));
    let mut cart = load_cart(&session).await?;
    cart.add_item(
        CartLineItem::from_product(&product, request.add_blue_light_filter),
        quantity,
    );
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", product.id.as_str())]),
    );

    Ok(Json(
        CartView::new(&cart).with_notification(Notification::success(format!(
            "{} added to cart",
            product.name
        ))),
    ))
}

/// Set a line's quantity (at least 1).
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Path(product_id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let key = LineKey::new(product_id, request.add_blue_light_filter);
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(&key, clamp_quantity(request.quantity));
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::new(&cart)))
}

#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Path(product_id): Path<String>,
    Query(params): Query<LineParams>,
) -> Result<Json<CartView>> {
    let key = LineKey::new(product_id, params.add_blue_light_filter);
    let mut cart = load_cart(&session).await?;
    cart.remove_item(&key);
    save_cart(&session, &cart).await?;

    let line = key.to_string();
    add_breadcrumb("cart", "Removed item", Some(&[("line", line.as_str())]));
    Ok(Json(CartView::new(&cart)))
}

pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let cart = Cart::new();
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::new(&cart)))
}
