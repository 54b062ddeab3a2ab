//! In-process record store.
//!
//! Keeps everything in memory behind a lock. Used by the integration tests
//! and for running the server without a database.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use imeliq_core::{Feeling, FeedbackId, OrderId, OrderStatus, RecordKind, TesterId};

use super::{RecordStore, RepositoryError};
use crate::models::{
    AuditLogEntry, Feedback, FeedbackStats, NewFeedback, NewOrder, NewTester, Order, Tester,
};

#[derive(Debug, Default)]
struct Tables {
    testers: Vec<Tester>,
    feedback: Vec<Feedback>,
    orders: Vec<Order>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: RwLock<Tables>,
    audit: RwLock<Vec<AuditLogEntry>>,
    unavailable: AtomicBool,
}

/// Record store that lives for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every record operation fail with [`RepositoryError::Unavailable`].
    ///
    /// Audit appends keep working so callers can observe what was recorded
    /// while the data tables were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of the audit trail, oldest first.
    pub async fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.inner.audit.read().await.clone()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rows in insertion order, returned newest first.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    out
}

impl RecordStore for MemoryStore {
    async fn insert_tester(&self, tester: &NewTester) -> Result<Tester, RepositoryError> {
        self.check_available()?;
        let mut tables = self.inner.tables.write().await;

        if tables.testers.iter().any(|t| t.email == tester.email) {
            return Err(RepositoryError::Conflict("email already exists".to_string()));
        }

        let row = Tester {
            id: TesterId::new_v4(),
            name: tester.name.clone(),
            family_name: tester.family_name.clone(),
            email: tester.email.clone(),
            phone: tester.phone.clone(),
            marketing_consent: tester.marketing_consent,
            locale: tester.locale.clone(),
            created_at: Utc::now(),
        };
        tables.testers.push(row.clone());
        Ok(row)
    }

    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, RepositoryError> {
        self.check_available()?;
        let row = Feedback {
            id: FeedbackId::new_v4(),
            product_code: feedback.product_code.clone(),
            referrer_name: feedback.referrer_name.clone(),
            feeling: feedback.feeling,
            comments: feedback.comments.clone(),
            created_at: Utc::now(),
        };
        self.inner.tables.write().await.feedback.push(row.clone());
        Ok(row)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        self.check_available()?;
        let row = Order {
            id: OrderId::new_v4(),
            email: order.email.clone(),
            quantity: order.quantity.get(),
            price_per_unit: order.price_per_unit,
            pickup_location: order.pickup_location,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        self.inner.tables.write().await.orders.push(row.clone());
        Ok(row)
    }

    async fn list_testers(&self) -> Result<Vec<Tester>, RepositoryError> {
        self.check_available()?;
        let tables = self.inner.tables.read().await;
        Ok(newest_first(&tables.testers, |t| t.created_at))
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>, RepositoryError> {
        self.check_available()?;
        let tables = self.inner.tables.read().await;
        Ok(newest_first(&tables.feedback, |f| f.created_at))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        self.check_available()?;
        let tables = self.inner.tables.read().await;
        Ok(newest_first(&tables.orders, |o| o.created_at))
    }

    async fn feedback_stats(&self) -> Result<Option<FeedbackStats>, RepositoryError> {
        self.check_available()?;
        let tables = self.inner.tables.read().await;

        let count = |feeling: Feeling| -> i64 {
            let n = tables.feedback.iter().filter(|f| f.feeling == feeling).count();
            i64::try_from(n).unwrap_or(i64::MAX)
        };

        Ok(Some(FeedbackStats {
            total_feedback: i64::try_from(tables.feedback.len()).unwrap_or(i64::MAX),
            positive_count: count(Feeling::Energy),
            negative_count: count(Feeling::Nothing),
            neutral_count: count(Feeling::Other),
        }))
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        self.check_available()?;
        let tables = self.inner.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        self.check_available()?;
        let mut tables = self.inner.tables.write().await;
        let Some(order) = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id && o.status == from)
        else {
            return Ok(None);
        };
        order.status = to;
        Ok(Some(order.clone()))
    }

    async fn delete_record(&self, kind: RecordKind, id: Uuid) -> Result<bool, RepositoryError> {
        self.check_available()?;
        let mut tables = self.inner.tables.write().await;

        let removed = match kind {
            RecordKind::Tester => remove_where(&mut tables.testers, |t| t.id.as_uuid() == id),
            RecordKind::Feedback => remove_where(&mut tables.feedback, |f| f.id.as_uuid() == id),
            RecordKind::Order => remove_where(&mut tables.orders, |o| o.id.as_uuid() == id),
        };
        Ok(removed)
    }

    async fn append_audit(&self, entry: &AuditLogEntry) -> Result<(), RepositoryError> {
        self.inner.audit.write().await.push(entry.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

fn remove_where<T>(rows: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = rows.len();
    rows.retain(|row| !matches(row));
    rows.len() != before
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use imeliq_core::{Email, PickupLocation, Quantity};
    use rust_decimal::Decimal;

    use super::*;

    fn new_tester(email: &str) -> NewTester {
        NewTester {
            name: "Mari".to_string(),
            family_name: None,
            email: Email::parse(email).unwrap(),
            phone: None,
            marketing_consent: false,
            locale: "et".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.insert_tester(&new_tester("mari@example.ee")).await.unwrap();

        let err = store
            .insert_tester(&new_tester(" MARI@example.ee "))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.list_testers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lists_newest_first() {
        let store = MemoryStore::new();
        for i in 0..3 {
            store
                .insert_tester(&new_tester(&format!("t{i}@example.ee")))
                .await
                .unwrap();
        }

        let testers = store.list_testers().await.unwrap();
        let emails: Vec<_> = testers.iter().map(|t| t.email.as_str()).collect();
        assert_eq!(emails, ["t2@example.ee", "t1@example.ee", "t0@example.ee"]);
    }

    #[tokio::test]
    async fn test_status_update_requires_expected_status() {
        let store = MemoryStore::new();
        let order = store
            .insert_order(&NewOrder {
                email: Email::parse("o@example.ee").unwrap(),
                quantity: Quantity::new(2).unwrap(),
                price_per_unit: Decimal::ONE,
                pickup_location: PickupLocation::Tartu,
            })
            .await
            .unwrap();

        let stale = store
            .update_order_status(order.id, OrderStatus::Confirmed, OrderStatus::Delivered)
            .await
            .unwrap();
        assert!(stale.is_none());

        let updated = store
            .update_order_status(order.id, OrderStatus::Pending, OrderStatus::Confirmed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let store = MemoryStore::new();
        let tester = store.insert_tester(&new_tester("d@example.ee")).await.unwrap();
        let id = tester.id.as_uuid();

        assert!(store.delete_record(RecordKind::Tester, id).await.unwrap());
        assert!(!store.delete_record(RecordKind::Tester, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_store_still_records_audit() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.list_orders().await,
            Err(RepositoryError::Unavailable(_))
        ));

        let entry = AuditLogEntry {
            timestamp: Utc::now(),
            action: crate::models::AuditAction::DataAccess,
            actor_ip: "127.0.0.1".to_string(),
            user_agent: "test".to_string(),
            details: serde_json::Map::new(),
        };
        store.append_audit(&entry).await.unwrap();
        assert_eq!(store.audit_entries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_count_feelings() {
        let store = MemoryStore::new();
        for feeling in [Feeling::Energy, Feeling::Energy, Feeling::Nothing] {
            store
                .insert_feedback(&NewFeedback {
                    product_code: "IMQ-1".to_string(),
                    referrer_name: "Kati".to_string(),
                    feeling,
                    comments: None,
                })
                .await
                .unwrap();
        }

        let stats = store.feedback_stats().await.unwrap().unwrap();
        assert_eq!(stats.total_feedback, 3);
        assert_eq!(stats.positive_count, 2);
        assert_eq!(stats.negative_count, 1);
        assert_eq!(stats.neutral_count, 0);
    }
}
