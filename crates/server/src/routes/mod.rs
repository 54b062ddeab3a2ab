//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness
//! GET    /health/ready         - Readiness (store reachable)
//!
//! # Public intake
//! POST   /register             - Register a tester
//! POST   /feedback             - Submit feedback
//! POST   /order                - Place a pre-order
//!
//! # Admin
//! POST   /admin/auth           - Log in
//! GET    /admin/auth           - Session check
//! DELETE /admin/auth           - Log out
//! GET    /admin/data           - Fetch / CSV export (session or API key)
//! DELETE /admin/data           - Erase a record (session)
//! PATCH  /admin/data           - Update order status (session)
//! ```

pub mod admin_auth;
pub mod admin_data;
pub mod intake;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::db::RecordStore;
use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the public intake routes.
pub fn intake_routes<S: RecordStore>(rate_limit: bool) -> Router<AppState<S>> {
    let router = Router::new()
        .route("/register", post(intake::register::<S>))
        .route("/feedback", post(intake::submit_feedback::<S>))
        .route("/order", post(intake::submit_order::<S>));

    if rate_limit {
        router.layer(api_rate_limiter())
    } else {
        router
    }
}

/// Create the admin auth routes.
pub fn admin_auth_routes<S: RecordStore>(rate_limit: bool) -> Router<AppState<S>> {
    let router = Router::new().route(
        "/",
        post(admin_auth::login::<S>)
            .get(admin_auth::check_session::<S>)
            .delete(admin_auth::logout::<S>),
    );

    if rate_limit {
        router.layer(auth_rate_limiter())
    } else {
        router
    }
}

/// Create the admin data routes.
pub fn admin_data_routes<S: RecordStore>(rate_limit: bool) -> Router<AppState<S>> {
    let router = Router::new().route(
        "/",
        get(admin_data::fetch::<S>)
            .delete(admin_data::erase::<S>)
            .patch(admin_data::update_status::<S>),
    );

    if rate_limit {
        router.layer(api_rate_limiter())
    } else {
        router
    }
}

/// Create all application routes.
pub fn routes<S: RecordStore>(rate_limit: bool) -> Router<AppState<S>> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness::<S>))
        .merge(intake_routes(rate_limit))
        .nest("/admin/auth", admin_auth_routes(rate_limit))
        .nest("/admin/data", admin_data_routes(rate_limit))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness<S: RecordStore>(State(state): State<AppState<S>>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::config::tests::test_config;
    use crate::db::MemoryStore;

    fn app(store: MemoryStore) -> Router {
        let state = AppState::new(test_config(), store).unwrap();
        routes(false).with_state(state)
    }

    async fn status_of(router: Router, uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        router.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        let store = MemoryStore::new();
        assert_eq!(status_of(app(store.clone()), "/health/ready").await, StatusCode::OK);

        store.set_unavailable(true);
        assert_eq!(
            status_of(app(store.clone()), "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(app(store), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        assert_eq!(
            status_of(app(MemoryStore::new()), "/admin/secret").await,
            StatusCode::NOT_FOUND
        );
    }
}
