//! Integration test harness for Imeliq.
//!
//! Tests drive the full router, middleware included, in-process against a
//! [`MemoryStore`], so no database or running server is needed:
//!
//! ```bash
//! cargo test -p imeliq-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use imeliq_server::build_app;
use imeliq_server::config::AppConfig;
use imeliq_server::db::MemoryStore;
use imeliq_server::models::AuditLogEntry;
use imeliq_server::state::AppState;

pub const ADMIN_PASSWORD: &str = "kuldne-ananass-2026";
pub const API_KEY: &str = "k7Qx9vLm2Rt8Wp4Zs6Nb3Hc5Jd1Fg0Ya";

/// Configuration with an admin password, an API key and no rate limiting.
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: SecretString::from("postgres://unused@localhost/imeliq_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("Zp8Lq2Wx7Nc4Rv9Tb1Hm6Ks3Jd5Fg0Ye"),
        admin_password: Some(SecretString::from(ADMIN_PASSWORD)),
        api_key: Some(SecretString::from(API_KEY)),
        rate_limit: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A router plus a handle on the store behind it.
pub struct TestApp {
    pub store: MemoryStore,
    router: Router,
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    #[must_use]
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    #[must_use]
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(config, store.clone()).unwrap();
        Self {
            store,
            router: build_app(state),
        }
    }

    /// Send one request. `auth` is a full `Cookie` or `Authorization` header.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        auth: Option<(header::HeaderName, String)>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, "imeliq-tests");
        if let Some((name, value)) = auth {
            builder = builder.header(name, HeaderValue::from_str(&value).unwrap());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    /// Log in and return the `Cookie` header carrying the session.
    pub async fn login(&self) -> (header::HeaderName, String) {
        let response = self
            .post_json("/admin/auth", serde_json::json!({ "password": ADMIN_PASSWORD }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed");
        let set_cookie = response.header(header::SET_COOKIE).unwrap();
        let pair = set_cookie.split(';').next().unwrap().to_string();
        (header::COOKIE, pair)
    }

    #[must_use]
    pub fn bearer(key: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {key}"))
    }

    pub async fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.store.audit_entries().await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
