//! Record store access.
//!
//! # Tables
//!
//! - `testers` - Tester registrations (unique email)
//! - `feedback` - Product feedback
//! - `orders` - Pre-orders
//! - `feedback_stats` - View with aggregate feedback counts
//! - `audit_log` - Append-only audit trail
//!
//! Handlers talk to the store through [`RecordStore`]. Production uses
//! [`PgRecordStore`]; tests and local demos use [`MemoryStore`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p imeliq-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use uuid::Uuid;

use imeliq_core::{OrderId, OrderStatus, RecordKind};

use crate::models::{
    AuditLogEntry, Feedback, FeedbackStats, NewFeedback, NewOrder, NewTester, Order, Tester,
};

pub use memory::MemoryStore;
pub use postgres::PgRecordStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Query/insert/delete interface over the record tables.
///
/// Implementations must be cheap to clone; one handle is built at startup
/// and shared by every request.
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Insert a tester.
    ///
    /// Returns [`RepositoryError::Conflict`] when the email is already
    /// registered.
    fn insert_tester(
        &self,
        tester: &NewTester,
    ) -> impl Future<Output = Result<Tester, RepositoryError>> + Send;

    fn insert_feedback(
        &self,
        feedback: &NewFeedback,
    ) -> impl Future<Output = Result<Feedback, RepositoryError>> + Send;

    /// Insert an order with status `pending`.
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;

    /// All testers, newest first.
    fn list_testers(&self) -> impl Future<Output = Result<Vec<Tester>, RepositoryError>> + Send;

    /// All feedback, newest first.
    fn list_feedback(&self)
    -> impl Future<Output = Result<Vec<Feedback>, RepositoryError>> + Send;

    /// All orders, newest first.
    fn list_orders(&self) -> impl Future<Output = Result<Vec<Order>, RepositoryError>> + Send;

    /// The aggregate feedback row, if the store has one.
    fn feedback_stats(
        &self,
    ) -> impl Future<Output = Result<Option<FeedbackStats>, RepositoryError>> + Send;

    fn find_order(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, RepositoryError>> + Send;

    /// Set an order's status if it is still `from`.
    ///
    /// Returns `None` when the order is gone or its status changed since it
    /// was read.
    fn update_order_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> impl Future<Output = Result<Option<Order>, RepositoryError>> + Send;

    /// Permanently delete one record. Returns whether a row was removed.
    fn delete_record(
        &self,
        kind: RecordKind,
        id: Uuid,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    fn append_audit(
        &self,
        entry: &AuditLogEntry,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Connectivity check for the readiness probe.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
