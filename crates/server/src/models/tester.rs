//! Tester registrations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use imeliq_core::{Email, TesterId};

/// A registered tester.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tester {
    pub id: TesterId,
    pub name: String,
    pub family_name: Option<String>,
    pub email: Email,
    pub phone: Option<String>,
    pub marketing_consent: bool,
    pub locale: String,
    pub created_at: DateTime<Utc>,
}

/// A validated registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTester {
    pub name: String,
    pub family_name: Option<String>,
    pub email: Email,
    pub phone: Option<String>,
    pub marketing_consent: bool,
    pub locale: String,
}
