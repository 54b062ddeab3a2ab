use chrono::{DateTime, Utc};
use serde::Serialize;

use imeliq_core::{Feeling, FeedbackId};

/// Product feedback left after a trial.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: FeedbackId,
    pub product_code: String,
    pub referrer_name: String,
    pub feeling: Feeling,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub product_code: String,
    pub referrer_name: String,
    pub feeling: Feeling,
    pub comments: Option<String>,
}
