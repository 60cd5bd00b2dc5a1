//! Session cart.

#![allow(clippy::unwrap_used)]

use prime_optic_integration_tests::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_adding_same_product_merges_lines() {
    let app = TestApp::spawn().await;
    let aviator = app.product_id("rb-aviator").await;

    let (status, body) = app
        .post("/api/cart/items", &json!({"productId": aviator}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["level"], "success");

    let (_, body) = app
        .post("/api/cart/items", &json!({"productId": aviator, "quantity": 2}))
        .await;

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[0]["key"], aviator.as_str());
    assert_eq!(body["subtotal"], 150.0);
    assert_eq!(body["itemCount"], 3);
}

#[tokio::test]
async fn test_blue_light_filter_is_a_separate_line() {
    let app = TestApp::spawn().await;
    let aviator = app.product_id("rb-aviator").await;

    app.post("/api/cart/items", &json!({"productId": aviator}))
        .await;
    let (_, body) = app
        .post(
            "/api/cart/items",
            &json!({"productId": aviator, "addBlueLightFilter": true}),
        )
        .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][1]["key"], format!("{aviator}-bluefilter"));

    let (_, body) = app
        .delete(&format!("/api/cart/items/{aviator}?addBlueLightFilter=true"))
        .await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["addBlueLightFilter"], false);
}

#[tokio::test]
async fn test_update_quantity_is_at_least_one() {
    let app = TestApp::spawn().await;
    let wayfarer = app.product_id("rb-wayfarer").await;
    app.post("/api/cart/items", &json!({"productId": wayfarer}))
        .await;

    let (_, body) = app
        .put(&format!("/api/cart/items/{wayfarer}"), &json!({"quantity": 4}))
        .await;
    assert_eq!(body["items"][0]["quantity"], 4);
    assert_eq!(body["items"][0]["lineTotal"], 560.0);

    let (_, body) = app
        .put(&format!("/api/cart/items/{wayfarer}"), &json!({"quantity": 0}))
        .await;
    assert_eq!(body["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let app = TestApp::spawn().await;
    let aviator = app.product_id("rb-aviator").await;
    let cat_eye = app.product_id("gg-cat-eye").await;
    app.post("/api/cart/items", &json!({"productId": aviator}))
        .await;
    app.post("/api/cart/items", &json!({"productId": cat_eye}))
        .await;

    // Removing a line that is not there changes nothing
    let (_, body) = app.delete("/api/cart/items/nope").await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let (_, body) = app.delete(&format!("/api/cart/items/{aviator}")).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["subtotal"], 320.0);

    let (_, body) = app.delete("/api/cart").await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["subtotal"], 0.0);
}

#[tokio::test]
async fn test_cart_belongs_to_the_session() {
    let app = TestApp::spawn().await;
    let aviator = app.product_id("rb-aviator").await;
    app.post("/api/cart/items", &json!({"productId": aviator}))
        .await;

    let (_, body) = app.get("/api/cart").await;
    assert_eq!(body["itemCount"], 1);

    let other = app.visitor();
    let (_, body) = other.get("/api/cart").await;
    assert_eq!(body["itemCount"], 0);
}

#[tokio::test]
async fn test_unknown_product_is_not_added() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/api/cart/items", &json!({"productId": "missing"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["notification"]["message"], "Product not found");
}
