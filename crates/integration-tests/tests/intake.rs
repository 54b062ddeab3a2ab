//! Public intake endpoints: registration, feedback and pre-orders.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::str::FromStr;

use axum::http::StatusCode;
use imeliq_integration_tests::TestApp;
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

#[tokio::test]
async fn test_register_then_duplicate_email_conflicts() {
    let app = TestApp::new();
    let body = json!({
        "name": "Mari",
        "family_name": "Tamm",
        "email": "mari@example.ee",
        "marketing_consent": true,
    });

    let first = app.post_json("/register", body.clone()).await;
    assert_eq!(first.status, StatusCode::OK);
    let json = first.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], "mari@example.ee");
    assert_eq!(json["data"]["locale"], "et");

    let again = app.post_json("/register", body).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.json()["error"], "This email is already registered");
}

#[tokio::test]
async fn test_register_duplicate_email_is_case_insensitive() {
    let app = TestApp::new();
    let first = app
        .post_json("/register", json!({"name": "Jaan", "email": "jaan@example.ee"}))
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let again = app
        .post_json("/register", json!({"name": "Jaan", "email": "  JAAN@Example.ee "}))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_is_audited_without_raw_email() {
    let app = TestApp::new();
    app.post_json("/register", json!({"name": "Kati", "email": "kati@example.ee"}))
        .await;

    let entries = app.audit_entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action.as_str(), "TESTER_REGISTERED");
    let details = serde_json::to_string(&entries[0].details).unwrap();
    assert!(!details.contains("kati@example.ee"));
    assert_eq!(entries[0].user_agent, "imeliq-tests");
}

#[tokio::test]
async fn test_register_requires_name_and_valid_email() {
    let app = TestApp::new();

    let missing = app
        .post_json("/register", json!({"email": "a@b.ee"}))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let bad = app
        .post_json("/register", json!({"name": "A", "email": "not-an-email"}))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert!(app.audit_entries().await.is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .send(
            axum::http::Method::POST,
            "/register",
            Some(json!("just a string")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_feedback_feeling_must_be_known() {
    let app = TestApp::new();

    for feeling in ["nothing", "energy", "other"] {
        let response = app
            .post_json(
                "/feedback",
                json!({
                    "product_code": "IMQ-01",
                    "referrer_name": "Liis",
                    "feeling": feeling,
                    "comments": "maitses hästi",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "feeling {feeling}");
        assert_eq!(response.json()["data"]["feeling"], feeling);
    }

    let rejected = app
        .post_json(
            "/feedback",
            json!({
                "product_code": "IMQ-01",
                "referrer_name": "Liis",
                "feeling": "ecstatic",
            }),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_total_is_quantity_times_price() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/order",
            json!({
                "email": "ostja@example.ee",
                "quantity": 3,
                "gave_data": false,
                "pickup_location": "tallinn",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(decimal(&json["total"]), Decimal::from(6));
    assert_eq!(decimal(&json["data"]["price_per_unit"]), Decimal::TWO);
    assert_eq!(json["data"]["quantity"], 3);
    assert_eq!(json["data"]["status"], "pending");
}

#[tokio::test]
async fn test_order_quantity_defaults_to_one() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/order",
            json!({"email": "a@example.ee", "pickup_location": "courier"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["data"]["quantity"], 1);
    assert_eq!(decimal(&json["total"]), Decimal::ONE);
}

#[tokio::test]
async fn test_order_quantity_out_of_range_is_rejected() {
    let app = TestApp::new();

    for quantity in [json!(0), json!(101), json!(-1), json!("lots"), json!(1.5)] {
        let response = app
            .post_json(
                "/order",
                json!({
                    "email": "a@example.ee",
                    "pickup_location": "tartu",
                    "quantity": quantity,
                }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::BAD_REQUEST,
            "quantity {quantity}"
        );
    }

    let edge = app
        .post_json(
            "/order",
            json!({"email": "a@example.ee", "pickup_location": "tartu", "quantity": 100}),
        )
        .await;
    assert_eq!(edge.status, StatusCode::OK);
}

#[tokio::test]
async fn test_intake_fails_cleanly_when_store_is_down() {
    let app = TestApp::new();
    app.store.set_unavailable(true);

    let response = app
        .post_json(
            "/feedback",
            json!({"product_code": "IMQ-01", "referrer_name": "Liis", "feeling": "energy"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["error"], "Database error");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    let live = app
        .send(axum::http::Method::GET, "/health", None, None)
        .await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.text(), "ok");
    assert!(live.header(axum::http::header::HeaderName::from_static("x-request-id")).is_some());

    app.store.set_unavailable(true);
    let ready = app
        .send(axum::http::Method::GET, "/health/ready", None, None)
        .await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
}
