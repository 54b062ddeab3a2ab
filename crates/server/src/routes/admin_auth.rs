//! Admin login, session check and logout.
//!
//! ```text
//! POST   /admin/auth  {password}  - Log in, sets the session cookie
//! GET    /admin/auth              - {authenticated: bool}
//! DELETE /admin/auth              - Log out, clears the session cookie
//! ```

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::middleware::{ClientInfo, clear_session_cookie, session_cookie, session_token};
use crate::models::AuditAction;
use crate::services::secret_matches;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

/// Log in with the admin password.
///
/// Fails closed with 500 when no admin password is configured.
#[instrument(skip_all)]
pub async fn login<S: RecordStore>(
    State(state): State<AppState<S>>,
    client: ClientInfo,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Some(expected) = state.config().admin_password.as_ref() else {
        tracing::error!("IMELIQ_ADMIN_PASSWORD is not configured; refusing admin login");
        return Err(AppError::Configuration(
            "admin password not configured".to_string(),
        ));
    };

    let Json(req) = body?;
    let candidate = req.password.unwrap_or_default();

    if !secret_matches(&candidate, expected) {
        state
            .audit()
            .record(
                AuditAction::LoginFailed,
                &client,
                json!({ "reason": "invalid_password" }),
            )
            .await;
        tracing::warn!(actor_ip = %client.ip, "Admin login failed");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let tokens = state.tokens();
    let cookie = session_cookie(
        tokens.issue(),
        state.config().is_https(),
        tokens.max_age().num_seconds(),
    );

    state
        .audit()
        .record(AuditAction::LoginSuccess, &client, json!({}))
        .await;

    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// Report whether the request carries a valid session.
pub async fn check_session<S: RecordStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let authenticated =
        session_token(&headers).is_some_and(|token| state.tokens().validate(&token));

    Json(json!({ "authenticated": authenticated }))
}

#[instrument(skip_all)]
pub async fn logout<S: RecordStore>(
    State(state): State<AppState<S>>,
    client: ClientInfo,
) -> Response {
    state
        .audit()
        .record(AuditAction::Logout, &client, json!({}))
        .await;

    let cookie = clear_session_cookie(state.config().is_https());
    (
        [(SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    )
        .into_response()
}
