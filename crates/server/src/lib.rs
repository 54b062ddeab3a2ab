//! Imeliq server library.
//!
//! Collects tester registrations, product feedback and pre-orders through
//! public JSON endpoints and exposes an authenticated admin API for viewing,
//! exporting and erasing them. The binary in `main.rs` wires this library to
//! `PostgreSQL`; tests drive [`build_app`] against [`db::MemoryStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use db::RecordStore;
use state::AppState;

/// Build the full router with tracing, request IDs and security headers.
///
/// Sentry layers are added by the binary around the returned router.
pub fn build_app<S: RecordStore>(state: AppState<S>) -> Router {
    let rate_limit = state.config().rate_limit;

    routes::routes(rate_limit)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
