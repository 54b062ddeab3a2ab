//! `PostgreSQL` record store.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use imeliq_core::{OrderId, OrderStatus, RecordKind};

use super::{RecordStore, RepositoryError};
use crate::models::{
    AuditLogEntry, Feedback, FeedbackStats, NewFeedback, NewOrder, NewTester, Order, Tester,
};

const TESTER_COLUMNS: &str =
    "id, name, family_name, email, phone, marketing_consent, locale, created_at";
const FEEDBACK_COLUMNS: &str = "id, product_code, referrer_name, feeling, comments, created_at";
const ORDER_COLUMNS: &str =
    "id, email, quantity, price_per_unit, pickup_location, status, created_at";

/// Record store backed by a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

impl RecordStore for PgRecordStore {
    async fn insert_tester(&self, tester: &NewTester) -> Result<Tester, RepositoryError> {
        sqlx::query_as::<_, Tester>(&format!(
            r"
            INSERT INTO testers (name, family_name, email, phone, marketing_consent, locale)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TESTER_COLUMNS}
            "
        ))
        .bind(&tester.name)
        .bind(&tester.family_name)
        .bind(&tester.email)
        .bind(&tester.phone)
        .bind(tester.marketing_consent)
        .bind(&tester.locale)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email"))
    }

    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, RepositoryError> {
        let row = sqlx::query_as::<_, Feedback>(&format!(
            r"
            INSERT INTO feedback (product_code, referrer_name, feeling, comments)
            VALUES ($1, $2, $3, $4)
            RETURNING {FEEDBACK_COLUMNS}
            "
        ))
        .bind(&feedback.product_code)
        .bind(&feedback.referrer_name)
        .bind(feedback.feeling)
        .bind(&feedback.comments)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (email, quantity, price_per_unit, pickup_location, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(&order.email)
        .bind(order.quantity.get())
        .bind(order.price_per_unit)
        .bind(order.pickup_location)
        .bind(OrderStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_testers(&self) -> Result<Vec<Tester>, RepositoryError> {
        let rows = sqlx::query_as::<_, Tester>(&format!(
            "SELECT {TESTER_COLUMNS} FROM testers ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>, RepositoryError> {
        let rows = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn feedback_stats(&self) -> Result<Option<FeedbackStats>, RepositoryError> {
        let row = sqlx::query_as::<_, FeedbackStats>(
            r"
            SELECT total_feedback, positive_count, negative_count, neutral_count
            FROM feedback_stats
            ",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, Order>(&format!(
            r"
            UPDATE orders SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_record(&self, kind: RecordKind, id: Uuid) -> Result<bool, RepositoryError> {
        let sql = match kind {
            RecordKind::Tester => "DELETE FROM testers WHERE id = $1",
            RecordKind::Feedback => "DELETE FROM feedback WHERE id = $1",
            RecordKind::Order => "DELETE FROM orders WHERE id = $1",
        };

        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_audit(&self, entry: &AuditLogEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO audit_log (occurred_at, action, actor_ip, user_agent, details)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(entry.timestamp)
        .bind(entry.action.as_str())
        .bind(&entry.actor_ip)
        .bind(&entry.user_agent)
        .bind(Json(&entry.details))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
