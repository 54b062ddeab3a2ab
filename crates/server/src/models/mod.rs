//! Domain models for the server.
//!
//! Row types are what the store returns and what the admin API serializes;
//! `New*` types are validated input ready to be inserted.

pub mod audit;
pub mod feedback;
pub mod order;
pub mod stats;
pub mod tester;

pub use audit::{AuditAction, AuditLogEntry};
pub use feedback::{Feedback, NewFeedback};
pub use order::{NewOrder, Order};
pub use stats::{FeedbackStats, FeedbackStatsView};
pub use tester::{NewTester, Tester};
