//! Favorites, per device.

#![allow(clippy::unwrap_used)]

use prime_optic_integration_tests::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_add_is_idempotent() {
    let app = TestApp::spawn().await;
    let aviator = app.product_id("rb-aviator").await;

    let (status, body) = app
        .post(&format!("/api/favorites/{aviator}"), &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["notification"]["level"], "success");

    let (_, body) = app
        .post(&format!("/api/favorites/{aviator}"), &json!({}))
        .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["favorites"][0]["slug"], "rb-aviator");

    let (_, body) = app.get(&format!("/api/favorites/{aviator}")).await;
    assert_eq!(body["isFavorite"], true);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let app = TestApp::spawn().await;
    let aviator = app.product_id("rb-aviator").await;
    let wayfarer = app.product_id("rb-wayfarer").await;
    app.post(&format!("/api/favorites/{aviator}"), &json!({}))
        .await;
    app.post(&format!("/api/favorites/{wayfarer}"), &json!({}))
        .await;

    let (_, body) = app.delete(&format!("/api/favorites/{aviator}")).await;
    assert_eq!(body["count"], 1);
    let (_, body) = app.get(&format!("/api/favorites/{aviator}")).await;
    assert_eq!(body["isFavorite"], false);

    let (_, body) = app.delete("/api/favorites").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_unknown_product_cannot_be_saved() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .post("/api/favorites/missing", &json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_survive_sign_in_and_sign_out() {
    let app = TestApp::spawn().await;
    let cat_eye = app.product_id("gg-cat-eye").await;
    app.post(&format!("/api/favorites/{cat_eye}"), &json!({}))
        .await;

    app.sign_up("ana@example.com", "Ana").await;
    let (_, body) = app.get("/api/favorites").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["favorites"][0]["id"], cat_eye.as_str());

    let aviator = app.product_id("rb-aviator").await;
    app.post(&format!("/api/favorites/{aviator}"), &json!({}))
        .await;

    let (status, _) = app.post("/api/auth/sign-out", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/favorites").await;
    assert_eq!(body["count"], 2);

    // Another browser signed into the same account has its own set
    let laptop = app.visitor();
    let (status, _) = laptop.sign_in("ana@example.com").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = laptop.get("/api/favorites").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_favorites_are_written_through_to_the_store() {
    let app = TestApp::spawn().await;
    let wayfarer = app.product_id("rb-wayfarer").await;
    app.post(&format!("/api/favorites/{wayfarer}"), &json!({}))
        .await;

    let stored = app.kv.entries().await;
    assert_eq!(stored.len(), 1);
    let (key, value) = &stored[0];
    assert!(key.starts_with("favorites-storage:"));
    assert_eq!(value["favorites"][0]["slug"], "rb-wayfarer");
}

#[tokio::test]
async fn test_anonymous_favorites_are_per_device() {
    let app = TestApp::spawn().await;
    let aviator = app.product_id("rb-aviator").await;
    app.post(&format!("/api/favorites/{aviator}"), &json!({}))
        .await;

    let (_, body) = app.get("/api/favorites").await;
    assert_eq!(body["count"], 1);

    let (_, body) = app.visitor().get("/api/favorites").await;
    assert_eq!(body["count"], 0);
}
