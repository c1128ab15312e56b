//! Checkout and coupons through the HTTP API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use nordic_integration_tests::{MockBackend, PAYMENT_URL, TestClient};
use serde_json::{Value, json};

fn address() -> Value {
    json!({
        "street": " Nørregade ",
        "streetNumber": "12B",
        "zip": "2100",
        "city": "København",
    })
}

async fn client_with_widgets(backend: &MockBackend) -> TestClient {
    let mut client = TestClient::new(&backend.url);
    let widget = json!({"id": "p1", "name": "Widget", "price": "19.99"});
    client.post("/api/cart/items", widget.clone()).await;
    client.post("/api/cart/items", widget).await;
    client
}

#[tokio::test]
async fn test_checkout_hands_cart_to_payment_and_clears_it() {
    let backend = MockBackend::start().await;
    let mut client = client_with_widgets(&backend).await;

    let response = client
        .post("/api/checkout", json!({"address": address()}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"url": PAYMENT_URL}));

    let sent = backend.checkouts();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        json!({
            "cart": [{"id": "p1", "name": "Widget", "price": 19.99, "quantity": 2}],
            "successUrl": "http://shop.test/?checkout=success",
            "cancelUrl": "http://shop.test/?checkout=cancel",
            "address": {
                "street": "Nørregade",
                "streetNumber": "12B",
                "zip": "2100",
                "city": "København",
            },
        })
    );

    let cart = client.get("/api/cart").await;
    assert_eq!(cart.body["items"], json!([]));
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let response = client
        .post("/api/checkout", json!({"address": address()}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Your cart is empty");
    assert!(backend.checkouts().is_empty());
}

#[tokio::test]
async fn test_checkout_reports_address_fields() {
    let backend = MockBackend::start().await;
    let mut client = client_with_widgets(&backend).await;

    let response = client
        .post(
            "/api/checkout",
            json!({"address": {"street": "Main", "streetNumber": " ", "zip": "12", "city": "Oslo"}}),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["fields"],
        json!({
            "streetNumber": "Street number is required",
            "zip": "ZIP code must be 4-10 digits",
        })
    );

    let cart = client.get("/api/cart").await;
    assert_eq!(cart.body["totalItems"], 2);
}

#[tokio::test]
async fn test_checkout_with_coupon() {
    let backend = MockBackend::start().await;
    let mut client = client_with_widgets(&backend).await;

    let response = client
        .post(
            "/api/checkout",
            json!({"address": address(), "couponCode": " save5 "}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(backend.checkouts()[0]["couponCode"], "SAVE5");
}

#[tokio::test]
async fn test_checkout_with_rejected_coupon_keeps_cart() {
    let backend = MockBackend::start().await;
    let mut client = client_with_widgets(&backend).await;

    let response = client
        .post(
            "/api/checkout",
            json!({"address": address(), "couponCode": "BOGUS"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid coupon code");
    assert!(backend.checkouts().is_empty());

    let cart = client.get("/api/cart").await;
    assert_eq!(cart.body["totalItems"], 2);
}

#[tokio::test]
async fn test_validate_coupon() {
    let backend = MockBackend::start().await;
    let mut client = client_with_widgets(&backend).await;

    let response = client
        .post("/api/coupons/validate", json!({"couponCode": "save5"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"couponCode": "SAVE5", "discount": 5.0, "total": 34.98})
    );
}

#[tokio::test]
async fn test_validate_coupon_input_errors() {
    let backend = MockBackend::start().await;
    let mut client = TestClient::new(&backend.url);

    let blank = client
        .post("/api/coupons/validate", json!({"couponCode": "  "}))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.body["error"], "Please enter a coupon code");

    let empty_cart = client
        .post("/api/coupons/validate", json!({"couponCode": "SAVE5"}))
        .await;
    assert_eq!(empty_cart.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        empty_cart.body["error"],
        "Cart must have items to apply a coupon"
    );
}
