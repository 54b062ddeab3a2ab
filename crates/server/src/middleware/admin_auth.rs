//! Admin authentication: session cookie handling and extractors.
//!
//! The session is a stateless token (see [`crate::services::SessionTokens`])
//! carried in the `session` cookie. Read-only data access also accepts
//! `Authorization: Bearer <api key>` when an API key is configured.

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use crate::db::RecordStore;
use crate::error::AppError;
use crate::services::secret_matches;
use crate::state::AppState;

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Cookie carrying a freshly issued session token.
#[must_use]
pub fn session_cookie(token: String, secure: bool, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Cookie that makes the browser drop the session.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(String::new(), secure, 0)
}

/// Session token from the request's cookies, if any.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn has_valid_session<S: RecordStore>(headers: &HeaderMap, state: &AppState<S>) -> bool {
    session_token(headers).is_some_and(|token| state.tokens().validate(&token))
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Unauthorized".to_string())
}

/// Extractor that requires a valid admin session cookie.
pub struct RequireAdminSession;

impl<S: RecordStore> FromRequestParts<AppState<S>> for RequireAdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        if has_valid_session(&parts.headers, state) {
            Ok(Self)
        } else {
            Err(unauthorized())
        }
    }
}

/// How an admin request was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    Session,
    ApiKey,
}

impl AdminAccess {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::ApiKey => "api_key",
        }
    }
}

/// Extractor that accepts a session cookie or the configured API key.
pub struct RequireAdminOrApiKey(pub AdminAccess);

impl<S: RecordStore> FromRequestParts<AppState<S>> for RequireAdminOrApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        if has_valid_session(&parts.headers, state) {
            return Ok(Self(AdminAccess::Session));
        }

        match (bearer_token(&parts.headers), &state.config().api_key) {
            (Some(candidate), Some(expected)) if secret_matches(candidate, expected) => {
                Ok(Self(AdminAccess::ApiKey))
            }
            _ => Err(unauthorized()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), true, 86_400).to_string();
        assert!(cookie.starts_with("session=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false).to_string();
        assert!(cookie.contains("Max-Age=0"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_session_token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-def-0011; lang=et"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-def-0011"));
    }

    #[test]
    fn test_missing_or_empty_session_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("session="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer  key123 "));
        assert_eq!(bearer_token(&headers), Some("key123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic key123"));
        assert_eq!(bearer_token(&headers), None);
    }
}
