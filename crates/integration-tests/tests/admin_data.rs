//! Admin data access: fetch, CSV export, erase and order status updates.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode, header};
use imeliq_integration_tests::{API_KEY, TestApp};
use serde_json::json;

async fn seed(app: &TestApp) {
    for (name, email) in [("Mari", "mari@example.ee"), ("Jaan", "jaan@example.ee")] {
        let r = app
            .post_json("/register", json!({ "name": name, "email": email }))
            .await;
        assert_eq!(r.status, StatusCode::OK);
    }
    for (feeling, comments) in [
        ("energy", Some("sai; palju \"energiat\"")),
        ("nothing", None),
        ("energy", Some("hea")),
    ] {
        let r = app
            .post_json(
                "/feedback",
                json!({
                    "product_code": "IMQ-01",
                    "referrer_name": "Liis",
                    "feeling": feeling,
                    "comments": comments,
                }),
            )
            .await;
        assert_eq!(r.status, StatusCode::OK);
    }
}

async fn place_order(app: &TestApp) -> String {
    let r = app
        .post_json(
            "/order",
            json!({ "email": "ostja@example.ee", "quantity": 2, "pickup_location": "parnu" }),
        )
        .await;
    assert_eq!(r.status, StatusCode::OK);
    r.json()["data"]["id"].as_str().unwrap().to_string()
}

async fn data_audit_count(app: &TestApp) -> usize {
    app.audit_entries()
        .await
        .iter()
        .filter(|e| e.action.as_str().starts_with("DATA_"))
        .count()
}

#[tokio::test]
async fn test_fetch_requires_authentication() {
    let app = TestApp::new();

    let anonymous = app.send(Method::GET, "/admin/data", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.json()["error"], "Unauthorized");

    let wrong_key = app
        .send(
            Method::GET,
            "/admin/data",
            None,
            Some(TestApp::bearer("not-the-key")),
        )
        .await;
    assert_eq!(wrong_key.status, StatusCode::UNAUTHORIZED);

    assert!(app.audit_entries().await.is_empty());
}

#[tokio::test]
async fn test_fetch_all_with_session() {
    let app = TestApp::new();
    seed(&app).await;
    let cookie = app.login().await;

    let response = app
        .send(Method::GET, "/admin/data", None, Some(cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let json = response.json();
    assert_eq!(json["success"], true);
    assert!(json["timestamp"].is_string());
    let data = &json["data"];
    assert_eq!(data["testers"].as_array().unwrap().len(), 2);
    assert_eq!(data["feedback"].as_array().unwrap().len(), 3);
    assert_eq!(data["orders"].as_array().unwrap().len(), 0);
    assert_eq!(data["stats"]["total_feedback"], 3);
    assert_eq!(data["stats"]["positive_count"], 2);
}

#[tokio::test]
async fn test_fetch_single_type_with_api_key() {
    let app = TestApp::new();
    seed(&app).await;

    let response = app
        .send(
            Method::GET,
            "/admin/data?type=testers",
            None,
            Some(TestApp::bearer(API_KEY)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let data = response.json()["data"].clone();
    let keys: Vec<_> = data.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["testers"]);
    // Newest first
    assert_eq!(data["testers"][0]["email"], "jaan@example.ee");

    let entries = app.audit_entries().await;
    let access = entries.last().unwrap();
    assert_eq!(access.action.as_str(), "DATA_ACCESS");
    assert_eq!(access.details["auth"], "api_key");
    assert_eq!(access.details["type"], "testers");
}

#[tokio::test]
async fn test_api_key_cannot_erase() {
    let app = TestApp::new();
    let id = place_order(&app).await;

    let response = app
        .send(
            Method::DELETE,
            &format!("/admin/data?type=order&id={id}"),
            None,
            Some(TestApp::bearer(API_KEY)),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(data_audit_count(&app).await, 0);
}

#[tokio::test]
async fn test_invalid_type_is_rejected() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(Method::GET, "/admin/data?type=secrets", None, Some(cookie.clone()))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(
            Method::GET,
            "/admin/data?type=orders&format=xml",
            None,
            Some(cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_csv_export_lines_and_quoting() {
    let app = TestApp::new();
    seed(&app).await;
    let cookie = app.login().await;

    let response = app
        .send(
            Method::GET,
            "/admin/data?type=feedback&format=csv",
            None,
            Some(cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        Some("text/csv; charset=utf-8")
    );
    let disposition = response.header(header::CONTENT_DISPOSITION).unwrap();
    assert!(disposition.starts_with("attachment; filename=imeliq_feedback_"));
    assert!(disposition.ends_with(".csv"));

    let text = response.text();
    assert!(text.starts_with('\u{feff}'));
    let lines: Vec<_> = text.trim_start_matches('\u{feff}').split('\n').collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("id;product_code;referrer_name;feeling;comments"));
    assert!(lines.iter().any(|l| l.contains("\"sai; palju \"\"energiat\"\"\"")));

    let export = app.audit_entries().await.last().cloned().unwrap();
    assert_eq!(export.action.as_str(), "DATA_EXPORT");
    assert_eq!(export.details["record_count"], 3);
}

#[tokio::test]
async fn test_csv_export_of_empty_category_is_not_found() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(
            Method::GET,
            "/admin/data?type=orders&format=csv",
            None,
            Some(cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "No data");
    assert_eq!(data_audit_count(&app).await, 1);
}

#[tokio::test]
async fn test_csv_export_needs_single_type() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(Method::GET, "/admin/data?format=csv", None, Some(cookie))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_csv_is_single_row() {
    let app = TestApp::new();
    seed(&app).await;
    let cookie = app.login().await;

    let response = app
        .send(
            Method::GET,
            "/admin/data?type=stats&format=csv",
            None,
            Some(cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let text = response.text();
    assert_eq!(text.trim_start_matches('\u{feff}').split('\n').count(), 2);
}

#[tokio::test]
async fn test_store_failure_is_still_audited_once() {
    let app = TestApp::new();
    let cookie = app.login().await;
    app.store.set_unavailable(true);

    for uri in [
        "/admin/data?type=feedback",
        "/admin/data?type=orders&format=csv",
    ] {
        let before = data_audit_count(&app).await;
        let response = app
            .send(Method::GET, uri, None, Some(cookie.clone()))
            .await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(response.json()["error"], "Database error");
        assert_eq!(data_audit_count(&app).await, before + 1, "{uri}");
    }

    let export = app.audit_entries().await.last().cloned().unwrap();
    assert!(export.details["error"].is_string());
}

#[tokio::test]
async fn test_store_failure_on_erase_and_update_is_audited_once() {
    let app = TestApp::new();
    let id = place_order(&app).await;
    let cookie = app.login().await;
    let uri = format!("/admin/data?type=order&id={id}");
    app.store.set_unavailable(true);

    let before = data_audit_count(&app).await;
    let erase = app
        .send(Method::DELETE, &uri, None, Some(cookie.clone()))
        .await;
    assert_eq!(erase.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(erase.json()["error"], "Database error");
    assert_eq!(data_audit_count(&app).await, before + 1);
    let last = app.audit_entries().await.last().cloned().unwrap();
    assert_eq!(last.action.as_str(), "DATA_DELETE");
    assert_eq!(last.details["id"], id.as_str());

    let update = app
        .send(
            Method::PATCH,
            &uri,
            Some(json!({ "status": "confirmed" })),
            Some(cookie),
        )
        .await;
    assert_eq!(update.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(data_audit_count(&app).await, before + 2);
    let last = app.audit_entries().await.last().cloned().unwrap();
    assert_eq!(last.action.as_str(), "DATA_UPDATE");

    // Nothing was erased while the store was down.
    app.store.set_unavailable(false);
    let orders = app
        .send(Method::GET, "/admin/data?type=orders", None, Some(app.login().await))
        .await;
    assert_eq!(orders.json()["data"]["orders"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_erase_twice_reports_not_deleted() {
    let app = TestApp::new();
    let id = place_order(&app).await;
    let cookie = app.login().await;
    let uri = format!("/admin/data?type=order&id={id}");

    let first = app
        .send(Method::DELETE, &uri, None, Some(cookie.clone()))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json(), json!({ "success": true, "deleted": true }));

    let second = app
        .send(Method::DELETE, &uri, None, Some(cookie.clone()))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.json(), json!({ "success": true, "deleted": false }));

    assert_eq!(data_audit_count(&app).await, 2);

    let remaining = app
        .send(Method::GET, "/admin/data?type=orders", None, Some(cookie))
        .await;
    assert_eq!(remaining.json()["data"]["orders"], json!([]));
}

#[tokio::test]
async fn test_erase_validates_type_and_id() {
    let app = TestApp::new();
    let cookie = app.login().await;

    for uri in [
        "/admin/data?type=order",
        "/admin/data?type=order&id=not-a-uuid",
        "/admin/data?type=orders&id=67e55044-10b1-426f-9247-bb680e5fe0c8",
        "/admin/data?id=67e55044-10b1-426f-9247-bb680e5fe0c8",
    ] {
        let response = app
            .send(Method::DELETE, uri, None, Some(cookie.clone()))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
    }
    assert_eq!(data_audit_count(&app).await, 0);
}

#[tokio::test]
async fn test_order_status_moves_forward_only() {
    let app = TestApp::new();
    let id = place_order(&app).await;
    let cookie = app.login().await;
    let uri = format!("/admin/data?type=order&id={id}");

    let patch = |status: &'static str| {
        app.send(
            Method::PATCH,
            &uri,
            Some(json!({ "status": status })),
            Some(cookie.clone()),
        )
    };

    let confirmed = patch("confirmed").await;
    assert_eq!(confirmed.status, StatusCode::OK);
    assert_eq!(confirmed.json()["data"]["status"], "confirmed");

    let backwards = patch("pending").await;
    assert_eq!(backwards.status, StatusCode::CONFLICT);

    let same = patch("confirmed").await;
    assert_eq!(same.status, StatusCode::CONFLICT);

    let delivered = patch("delivered").await;
    assert_eq!(delivered.status, StatusCode::OK);
    assert_eq!(delivered.json()["data"]["status"], "delivered");

    let bogus = patch("shipped").await;
    assert_eq!(bogus.status, StatusCode::BAD_REQUEST);

    // Four valid requests reached the store; the unknown status did not.
    assert_eq!(data_audit_count(&app).await, 4);
}

#[tokio::test]
async fn test_order_status_for_missing_order_is_not_found() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(
            Method::PATCH,
            "/admin/data?type=order&id=67e55044-10b1-426f-9247-bb680e5fe0c8",
            Some(json!({ "status": "confirmed" })),
            Some(cookie.clone()),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "Order not found");

    let not_order = app
        .send(
            Method::PATCH,
            "/admin/data?type=tester&id=67e55044-10b1-426f-9247-bb680e5fe0c8",
            Some(json!({ "status": "confirmed" })),
            Some(cookie),
        )
        .await;
    assert_eq!(not_order.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = TestApp::new();
    let response = app.send(Method::GET, "/admin/data", None, None).await;

    let value = |name: &'static str| {
        response
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    assert_eq!(value("x-content-type-options").as_deref(), Some("nosniff"));
    assert_eq!(value("x-frame-options").as_deref(), Some("DENY"));
}
