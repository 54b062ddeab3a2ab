//! Request-independent logic used by the route handlers.

pub mod audit;
pub mod credentials;
pub mod csv;
pub mod intake;
pub mod session_token;

pub use audit::{AuditLogger, email_hash};
pub use credentials::secret_matches;
pub use session_token::SessionTokens;
