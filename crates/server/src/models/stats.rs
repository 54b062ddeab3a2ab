//! Aggregate feedback counts.

use serde::Serialize;

/// Row of the `feedback_stats` view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct FeedbackStats {
    pub total_feedback: i64,
    /// `energy` answers.
    pub positive_count: i64,
    /// `nothing` answers.
    pub negative_count: i64,
    /// `other` answers.
    pub neutral_count: i64,
}

/// Stats as reported by the admin API, with rounded percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedbackStatsView {
    #[serde(flatten)]
    pub counts: FeedbackStats,
    pub positive_percent: i64,
    pub negative_percent: i64,
}

impl From<FeedbackStats> for FeedbackStatsView {
    fn from(counts: FeedbackStats) -> Self {
        Self {
            counts,
            positive_percent: percent(counts.positive_count, counts.total_feedback),
            negative_percent: percent(counts.negative_count, counts.total_feedback),
        }
    }
}

/// Rounded `part / total` in percent, 0 when `total` is 0.
fn percent(part: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (part * 200 + total) / (total * 2)
}
