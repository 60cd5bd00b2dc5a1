//! Checkout wizard route handlers.
//!
//! The wizard state is kept in the session under [`session_keys::CHECKOUT`]
//! and created on first access, prefilled from the signed-in user.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use prime_optic_core::OrderId;

use crate::checkout::{CheckoutState, OrderTotals, delivery_options};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, CustomerInfo, DeliveryAddress, DeliveryOption, session_keys};
use crate::routes::cart::{load_cart, save_cart};
use crate::services::{Notification, orders};
use crate::state::AppState;
use crate::stores::Cart;

async fn load_checkout(session: &Session, user: Option<&CurrentUser>) -> Result<CheckoutState> {
    Ok(session
        .get::<CheckoutState>(session_keys::CHECKOUT)
        .await?
        .unwrap_or_else(|| CheckoutState::new(user)))
}

async fn save_checkout(session: &Session, checkout: &CheckoutState) -> Result<()> {
    session.insert(session_keys::CHECKOUT, checkout).await?;
    Ok(())
}

/// Wizard state plus what the current step needs to render.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    #[serde(flatten)]
    pub state: CheckoutState,
    pub totals: OrderTotals,
    pub delivery_options: Vec<DeliveryOption>,
    pub cart_empty: bool,
}

impl CheckoutView {
    fn new(state: CheckoutState, cart: &Cart) -> Self {
        Self {
            totals: OrderTotals::compute(cart, &state.selected_delivery),
            delivery_options: delivery_options(),
            cart_empty: cart.is_empty(),
            state,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    pub option_id: String,
    #[serde(default)]
    pub address: Option<DeliveryAddress>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub notification: Notification,
}

async fn respond(session: &Session, checkout: CheckoutState) -> Result<Json<CheckoutView>> {
    save_checkout(session, &checkout).await?;
    let cart = load_cart(session).await?;
    Ok(Json(CheckoutView::new(checkout, &cart)))
}

pub async fn show(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CheckoutView>> {
    let checkout = load_checkout(&session, user.as_ref()).await?;
    respond(&session, checkout).await
}

/// Step 1 fields. Editing them from a later step returns to step 1.
pub async fn update_contact(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(info): Json<CustomerInfo>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session, user.as_ref()).await?;
    checkout.set_contact(info);
    respond(&session, checkout).await
}

/// Step 2 fields: delivery option and, for home delivery, the address.
/// Editing them from the confirmation step returns to step 2.
pub async fn update_delivery(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<DeliveryRequest>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session, user.as_ref()).await?;
    checkout.select_delivery(&request.option_id)?;
    if let Some(address) = request.address {
        checkout.set_address(address);
    }
    respond(&session, checkout).await
}

pub async fn next(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session, user.as_ref()).await?;
    let step = checkout.advance()?.number().to_string();
    add_breadcrumb("checkout", "Advanced step", Some(&[("step", step.as_str())]));
    respond(&session, checkout).await
}

pub async fn back(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session, user.as_ref()).await?;
    checkout.back();
    respond(&session, checkout).await
}

/// Place the order.
///
/// The in-flight flag is saved before the backend call so a second submit
/// is refused until this one finishes or is abandoned. On success the cart
/// is emptied and the wizard reset; on failure the visitor stays on the
/// confirmation step.
#[instrument(skip(state, session, user))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<OrderPlaced>> {
    let cart = load_cart(&session).await?;
    let mut checkout = load_checkout(&session, user.as_ref()).await?;

    let order = orders::build_order(&cart, &checkout, user.as_ref())?;
    checkout.begin_submit(Utc::now())?;
    save_checkout(&session, &checkout).await?;
    session.save().await?;

    match orders::place_order(state.backend().orders.as_ref(), &order).await {
        Ok(order_id) => {
            save_cart(&session, &Cart::new()).await?;
            session
                .remove::<CheckoutState>(session_keys::CHECKOUT)
                .await?;
            Ok(Json(OrderPlaced {
                notification: Notification::success(orders::order_placed_message(&order_id)),
                order_id,
            }))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Order submission failed");
            checkout.finish_submit();
            save_checkout(&session, &checkout).await?;
            Err(e.into())
        }
    }
}
