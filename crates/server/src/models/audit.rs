//! Audit trail entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Security- and data-sensitive actions that are always audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    LoginSuccess,
    LoginFailed,
    Logout,
    DataAccess,
    DataExport,
    DataDelete,
    DataUpdate,
    TesterRegistered,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Logout => "LOGOUT",
            Self::DataAccess => "DATA_ACCESS",
            Self::DataExport => "DATA_EXPORT",
            Self::DataDelete => "DATA_DELETE",
            Self::DataUpdate => "DATA_UPDATE",
            Self::TesterRegistered => "TESTER_REGISTERED",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub actor_ip: String,
    pub user_agent: String,
    pub details: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serializes_in_screaming_case() {
        let json = serde_json::to_string(&AuditAction::TesterRegistered).unwrap_or_default();
        assert_eq!(json, "\"TESTER_REGISTERED\"");
        assert_eq!(AuditAction::DataDelete.to_string(), "DATA_DELETE");
    }
}
