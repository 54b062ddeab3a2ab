//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::RecordStore;
use crate::services::{AuditLogger, SessionTokens};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid session secret: {0}")]
    SessionSecret(#[from] hmac::digest::InvalidLength),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Generic over the record store so tests can
/// run the full router against [`crate::db::MemoryStore`].
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    config: AppConfig,
    store: S,
    tokens: SessionTokens,
    audit: AuditLogger<S>,
}

// Manual impl: `S: Clone` is not needed to clone the `Arc`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RecordStore> AppState<S> {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session token service cannot be built.
    pub fn new(config: AppConfig, store: S) -> Result<Self, StateError> {
        let tokens = SessionTokens::new(&config.session_secret)?;
        let audit = AuditLogger::new(store.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                tokens,
                audit,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    #[must_use]
    pub fn tokens(&self) -> &SessionTokens {
        &self.inner.tokens
    }

    #[must_use]
    pub fn audit(&self) -> &AuditLogger<S> {
        &self.inner.audit
    }
}
