//! Audit trail.
//!
//! Every authentication event and every admin data access produces exactly
//! one [`AuditLogEntry`]. Entries are emitted as a structured event on the
//! `audit` tracing target and appended to the store. A failed append is
//! logged and swallowed: auditing never fails the request it describes.

use chrono::Utc;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use imeliq_core::Email;

use crate::db::RecordStore;
use crate::middleware::ClientInfo;
use crate::models::{AuditAction, AuditLogEntry};

/// Writes audit entries to the log and the store.
#[derive(Debug, Clone)]
pub struct AuditLogger<S> {
    store: S,
}

impl<S: RecordStore> AuditLogger<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Record one audit entry.
    ///
    /// `details` should be a JSON object; any other value is stored under a
    /// `value` key.
    pub async fn record(&self, action: AuditAction, client: &ClientInfo, details: Value) {
        let entry = AuditLogEntry {
            timestamp: Utc::now(),
            action,
            actor_ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            details: into_object(details),
        };

        let details = Value::Object(entry.details.clone());
        tracing::info!(
            target: "audit",
            action = %entry.action,
            actor_ip = %entry.actor_ip,
            user_agent = %entry.user_agent,
            details = %details,
            "audit event"
        );

        if let Err(e) = self.store.append_audit(&entry).await {
            tracing::error!(
                error = %e,
                action = %entry.action,
                "Failed to persist audit entry"
            );
        }
    }
}

fn into_object(details: Value) -> Map<String, Value> {
    match details {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Short, non-reversible fingerprint of an email for the audit trail.
///
/// First 12 hex characters of SHA-256 over the normalised address.
#[must_use]
pub fn email_hash(email: &Email) -> String {
    let digest = Sha256::digest(email.as_str().as_bytes());
    hex::encode(digest.iter().take(6).copied().collect::<Vec<u8>>())
}
