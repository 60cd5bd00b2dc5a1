//! Eye exam booking.

#![allow(clippy::unwrap_used)]

use prime_optic_integration_tests::TestApp;
use prime_optic_storefront::backend::unconfigured::BOOKING_UNAVAILABLE;
use prime_optic_storefront::services::appointments::BOOKED_MESSAGE;
use reqwest::StatusCode;
use serde_json::{Value, json};

fn booking() -> Value {
    json!({
        "fullName": "Elira Berisha",
        "email": "elira@example.com",
        "phone": "+355 69 765 4321",
        "preferredStore": "Tirana Center",
        "preferredDate": "2026-11-02",
        "preferredTimeSlot": "14-16",
    })
}

#[tokio::test]
async fn test_time_slots() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/appointments/slots").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert_eq!(body[0]["code"], "09-11");
    assert_eq!(body[0]["label"], "09:00 – 11:00");
}

#[tokio::test]
async fn test_guest_booking() {
    let app = TestApp::spawn().await;

    let (status, body) = app.post("/api/appointments", &booking()).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["appointmentId"].is_string());
    assert_eq!(body["notification"]["message"], BOOKED_MESSAGE);
}

#[tokio::test]
async fn test_booking_shows_on_account() {
    let app = TestApp::spawn().await;
    app.sign_up("elira@example.com", "Elira").await;

    let (status, _) = app.post("/api/appointments", &booking()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/api/account/appointments").await;
    let appointments = body.as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["preferredTimeSlot"], "14-16");
    assert_eq!(appointments[0]["timeLabel"], "14:00 – 16:00");
    assert_eq!(appointments[0]["status"], "pending");
    assert_eq!(appointments[0]["preferredStore"], "Tirana Center");
}

#[tokio::test]
async fn test_booking_resolves_store_from_directory() {
    let app = TestApp::spawn().await;
    app.sign_up("elira@example.com", "Elira").await;

    let (_, stores) = app.get("/api/stores").await;
    let blloku = &stores[1];
    assert_eq!(blloku["isAvailable"], true);

    let mut at_blloku = booking();
    at_blloku["preferredStore"] = blloku["id"].clone();
    let (status, _) = app.post("/api/appointments", &at_blloku).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/api/account/appointments").await;
    assert_eq!(body[0]["preferredStore"], "Prime Optic - Blloku");

    let mut at_closed_store = booking();
    at_closed_store["preferredStore"] = json!("5");
    let (status, body) = app.post("/api/appointments", &at_closed_store).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["notification"]["message"],
        "Prime Optic - Airport Road is not taking appointments at the moment. Please choose another store."
    );
}

#[tokio::test]
async fn test_invalid_booking_is_rejected() {
    let app = TestApp::spawn().await;

    let mut missing_phone = booking();
    missing_phone["phone"] = json!(" ");
    let (status, body) = app.post("/api/appointments", &missing_phone).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["notification"]["message"], "Please fill in the phone field.");

    let mut bad_slot = booking();
    bad_slot["preferredTimeSlot"] = json!("18-20");
    let (status, _) = app.post("/api/appointments", &bad_slot).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_date = booking();
    bad_date["preferredDate"] = json!("next tuesday");
    let (status, _) = app.post("/api/appointments", &bad_date).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_unavailable_without_backend() {
    let app = TestApp::spawn_without_orders().await;

    let (status, body) = app.post("/api/appointments", &booking()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["notification"]["message"], BOOKING_UNAVAILABLE);
}
