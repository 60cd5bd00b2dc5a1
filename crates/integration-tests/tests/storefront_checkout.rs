//! Checkout wizard and order placement.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use prime_optic_core::UserId;
use prime_optic_integration_tests::TestApp;
use prime_optic_storefront::backend::OrderRepository;
use prime_optic_storefront::backend::unconfigured::ORDERS_UNAVAILABLE;
use reqwest::StatusCode;
use serde_json::{Value, json};

fn contact() -> Value {
    json!({
        "fullName": "Arben Hoxha",
        "email": "arben@example.com",
        "phone": "+355 69 123 4567",
    })
}

async fn fill_cart(app: &TestApp) {
    let aviator = app.product_id("rb-aviator").await;
    app.post("/api/cart/items", &json!({"productId": aviator, "quantity": 3}))
        .await;
}

/// Walk the wizard to the confirmation step with home delivery.
async fn reach_confirmation(app: &TestApp) -> Value {
    app.put("/api/checkout/contact", &contact()).await;
    app.post("/api/checkout/next", &json!({})).await;
    app.put(
        "/api/checkout/delivery",
        &json!({
            "optionId": "home_delivery",
            "address": {"street": "Rruga e Kavajes 12", "city": "Tirane"},
        }),
    )
    .await;
    let (status, body) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn test_fresh_wizard_starts_with_pickup() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/checkout").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 1);
    assert_eq!(body["selectedDelivery"]["id"], "pickup");
    assert_eq!(body["deliveryOptions"].as_array().unwrap().len(), 2);
    assert_eq!(body["cartEmpty"], true);
    assert_eq!(body["isSubmitting"], false);
}

#[tokio::test]
async fn test_wizard_prefills_signed_in_user() {
    let app = TestApp::spawn().await;
    app.sign_up("elira@example.com", "Elira Berisha").await;

    let (_, body) = app.get("/api/checkout").await;
    assert_eq!(body["customerInfo"]["fullName"], "Elira Berisha");
    assert_eq!(body["customerInfo"]["email"], "elira@example.com");
    assert_eq!(body["customerInfo"]["phone"], "");
}

#[tokio::test]
async fn test_contact_step_is_guarded() {
    let app = TestApp::spawn().await;
    fill_cart(&app).await;

    let (status, body) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["notification"]["message"],
        "Please fill in your full name, email and phone number."
    );

    app.put(
        "/api/checkout/contact",
        &json!({"fullName": "Arben", "email": "arben@example.com", "phone": "   "}),
    )
    .await;
    let (status, _) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.put("/api/checkout/contact", &contact()).await;
    let (status, body) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 2);
}

#[tokio::test]
async fn test_home_delivery_needs_an_address() {
    let app = TestApp::spawn().await;
    fill_cart(&app).await;
    app.put("/api/checkout/contact", &contact()).await;
    app.post("/api/checkout/next", &json!({})).await;

    let (_, body) = app
        .put("/api/checkout/delivery", &json!({"optionId": "home_delivery"}))
        .await;
    assert_eq!(body["totals"]["deliveryFee"], 2.0);
    assert_eq!(body["totals"]["total"], 152.0);

    let (status, _) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put("/api/checkout/delivery", &json!({"optionId": "drone"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Pickup needs no address
    app.put("/api/checkout/delivery", &json!({"optionId": "pickup"}))
        .await;
    let (status, body) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 3);
    assert_eq!(body["totals"]["total"], 150.0);
}

#[tokio::test]
async fn test_back_stops_at_first_step() {
    let app = TestApp::spawn().await;
    app.put("/api/checkout/contact", &contact()).await;
    app.post("/api/checkout/next", &json!({})).await;

    let (_, body) = app.post("/api/checkout/back", &json!({})).await;
    assert_eq!(body["step"], 1);
    let (_, body) = app.post("/api/checkout/back", &json!({})).await;
    assert_eq!(body["step"], 1);
    assert_eq!(body["customerInfo"]["fullName"], "Arben Hoxha");
}

#[tokio::test]
async fn test_place_order_with_home_delivery() {
    let app = TestApp::spawn().await;
    let user_id = app.sign_up("arben@example.com", "Arben Hoxha").await;
    fill_cart(&app).await;

    let body = reach_confirmation(&app).await;
    assert_eq!(body["step"], 3);
    assert_eq!(body["totals"]["subtotal"], 150.0);
    assert_eq!(body["totals"]["total"], 152.0);

    let (status, body) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = body["orderId"].as_str().unwrap().to_string();
    assert_eq!(body["notification"]["level"], "success");
    assert!(
        body["notification"]["message"]
            .as_str()
            .unwrap()
            .contains(&format!("Order ID: {order_id}"))
    );

    let orders = app
        .memory
        .query_by_user(&UserId::new(user_id))
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0].details;
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 3);
    assert_eq!(order.delivery_info.option.id, "home_delivery");
    assert_eq!(
        order.delivery_info.address.as_ref().unwrap().country,
        "Albania"
    );
    assert_eq!(order.total.to_string(), "€152.00");

    // Cart emptied and wizard reset
    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["itemCount"], 0);
    let (_, checkout) = app.get("/api/checkout").await;
    assert_eq!(checkout["step"], 1);

    let (_, history) = app.get("/api/account/orders").await;
    assert_eq!(history[0]["id"], order_id.as_str());
    assert_eq!(history[0]["status"], "pending");
}

#[tokio::test]
async fn test_guest_order_has_no_user() {
    let app = TestApp::spawn().await;
    fill_cart(&app).await;
    reach_confirmation(&app).await;

    let (status, _) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.memory.order_count().await, 1);
}

#[tokio::test]
async fn test_submit_only_from_confirmation() {
    let app = TestApp::spawn().await;
    fill_cart(&app).await;

    let (status, body) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["notification"]["message"],
        "Please review your order before placing it."
    );
    assert_eq!(app.memory.order_count().await, 0);
}

#[tokio::test]
async fn test_empty_cart_cannot_be_ordered() {
    let app = TestApp::spawn().await;
    reach_confirmation(&app).await;

    let (status, body) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["notification"]["message"], "Your cart is empty.");
}

#[tokio::test]
async fn test_failed_submission_can_be_retried() {
    let app = TestApp::spawn_without_orders().await;
    fill_cart(&app).await;
    reach_confirmation(&app).await;

    let (status, body) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["notification"]["message"], ORDERS_UNAVAILABLE);

    // Still on the confirmation step, not stuck submitting, cart intact
    let (_, checkout) = app.get("/api/checkout").await;
    assert_eq!(checkout["step"], 3);
    assert_eq!(checkout["isSubmitting"], false);
    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["itemCount"], 3);

    let (status, _) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

/// Walk the wizard to the confirmation step with pickup.
async fn reach_pickup_confirmation(app: &TestApp) {
    app.put("/api/checkout/contact", &contact()).await;
    app.post("/api/checkout/next", &json!({})).await;
    let (status, body) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["step"], 3);
}

/// Fire a submit whose response is never awaited past a short timeout.
async fn abandon_submit(app: &TestApp) {
    let result = app
        .client
        .post(app.url("/api/checkout/submit"))
        .json(&json!({}))
        .timeout(Duration::from_millis(300))
        .send()
        .await;
    assert!(result.is_err(), "stalled submit returned {result:?}");
}

#[tokio::test]
async fn test_editing_contact_on_confirmation_reopens_step_one() {
    let app = TestApp::spawn().await;
    fill_cart(&app).await;
    reach_pickup_confirmation(&app).await;

    let (status, body) = app
        .put(
            "/api/checkout/contact",
            &json!({"fullName": "", "email": "", "phone": ""}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 1);

    let (status, body) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["notification"]["message"],
        "Please review your order before placing it."
    );
    let (status, _) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.memory.order_count().await, 0);
}

#[tokio::test]
async fn test_switching_to_home_delivery_on_confirmation_needs_an_address() {
    let app = TestApp::spawn().await;
    fill_cart(&app).await;
    reach_pickup_confirmation(&app).await;

    let (_, body) = app
        .put("/api/checkout/delivery", &json!({"optionId": "home_delivery"}))
        .await;
    assert_eq!(body["step"], 2);
    assert_eq!(body["deliveryAddress"]["city"], "");

    let (status, _) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["notification"]["message"],
        "Please enter your street and city for home delivery."
    );
    assert_eq!(app.memory.order_count().await, 0);

    app.put(
        "/api/checkout/delivery",
        &json!({
            "optionId": "home_delivery",
            "address": {"street": "Rruga e Kavajes 12", "city": "Tirane"},
        }),
    )
    .await;
    app.post("/api/checkout/next", &json!({})).await;
    let (status, _) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.memory.order_count().await, 1);
}

#[tokio::test]
async fn test_second_submit_while_pending_is_refused() {
    let app = TestApp::spawn_with_stalling_orders().await;
    fill_cart(&app).await;
    reach_pickup_confirmation(&app).await;

    abandon_submit(&app).await;

    let (status, body) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["notification"]["message"],
        "Your order is already being placed."
    );
    let (_, checkout) = app.get("/api/checkout").await;
    assert_eq!(checkout["isSubmitting"], true);
    assert_eq!(app.memory.order_count().await, 0);
}

#[tokio::test]
async fn test_abandoned_submit_can_be_retried_after_going_back() {
    let app = TestApp::spawn_with_stalling_orders().await;
    fill_cart(&app).await;
    reach_pickup_confirmation(&app).await;

    abandon_submit(&app).await;

    let (_, body) = app.post("/api/checkout/back", &json!({})).await;
    assert_eq!(body["step"], 2);
    assert_eq!(body["isSubmitting"], false);
    let (_, body) = app.post("/api/checkout/next", &json!({})).await;
    assert_eq!(body["step"], 3);

    let (status, body) = app.post("/api/checkout/submit", &json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(app.memory.order_count().await, 1);
    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["itemCount"], 0);
}
