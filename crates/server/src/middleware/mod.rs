//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID
//! 4. Security headers
//! 5. Rate limiting (governor, per route group, optional)
//!
//! Admin authentication is done by extractors rather than layers.

pub mod admin_auth;
pub mod client_info;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use admin_auth::{
    AdminAccess, RequireAdminOrApiKey, RequireAdminSession, SESSION_COOKIE, clear_session_cookie,
    session_cookie, session_token,
};
pub use client_info::{ClientInfo, client_ip};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
