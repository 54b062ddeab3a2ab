//! CSV rendering for admin exports.
//!
//! Output is tuned for spreadsheet software used by the team: a UTF-8 byte
//! order mark, `;` as the delimiter, and `\n` line breaks. The header comes
//! from the first record's field names, in declaration order.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use imeliq_core::DataCategory;

use crate::db::{RecordStore, RepositoryError};
use crate::models::FeedbackStatsView;

/// UTF-8 byte order mark prepended to every export.
pub const BOM: char = '\u{feff}';

pub const DELIMITER: char = ';';

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("records must serialize to JSON objects")]
    NotAnObject,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export needs a single type")]
    NeedsSingleType,

    #[error(transparent)]
    Store(#[from] RepositoryError),

    #[error(transparent)]
    Csv(#[from] CsvError),
}

/// One category rendered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub record_count: usize,
    /// `None` when there was nothing to export.
    pub body: Option<String>,
}

impl Export {
    fn of<T: Serialize>(rows: &[T]) -> Result<Self, ExportError> {
        Ok(Self {
            record_count: rows.len(),
            body: render(rows)?,
        })
    }
}

/// Query one category from the store and render it.
///
/// Stats export as a single row.
///
/// # Errors
///
/// Returns [`ExportError::NeedsSingleType`] for [`DataCategory::All`], and
/// store or serialization failures otherwise.
pub async fn export<S: RecordStore>(
    store: &S,
    category: DataCategory,
) -> Result<Export, ExportError> {
    match category {
        DataCategory::Feedback => Export::of(&store.list_feedback().await?),
        DataCategory::Orders => Export::of(&store.list_orders().await?),
        DataCategory::Testers => Export::of(&store.list_testers().await?),
        DataCategory::Stats => {
            let stats = store.feedback_stats().await?.unwrap_or_default();
            Export::of(&[FeedbackStatsView::from(stats)])
        }
        DataCategory::All => Err(ExportError::NeedsSingleType),
    }
}

/// Render records as CSV.
///
/// Returns `Ok(None)` when there are no records. Keys missing from a later
/// record render as empty fields; extra keys are ignored.
///
/// # Errors
///
/// Returns [`CsvError`] if a record does not serialize to a JSON object.
pub fn render<T: Serialize>(records: &[T]) -> Result<Option<String>, CsvError> {
    let rows = records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(CsvError::NotAnObject),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let Some(first) = rows.first() else {
        return Ok(None);
    };
    let header: Vec<String> = first.keys().cloned().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_fields(header.iter().map(|h| escape(h))));
    for row in &rows {
        lines.push(join_fields(
            header
                .iter()
                .map(|key| escape(&field_text(row.get(key).unwrap_or(&Value::Null)))),
        ));
    }

    let mut out = String::new();
    out.push(BOM);
    out.push_str(&lines.join("\n"));
    Ok(Some(out))
}

/// Download file name for an export, e.g. `imeliq_orders_2026-03-01.csv`.
#[must_use]
pub fn file_name(category: &str, date: NaiveDate) -> String {
    format!("imeliq_{category}_{}.csv", date.format("%Y-%m-%d"))
}

fn join_fields(fields: impl Iterator<Item = String>) -> String {
    fields.collect::<Vec<_>>().join(&DELIMITER.to_string())
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Quote a field if it contains the delimiter, a quote, or a line break.
fn escape(field: &str) -> String {
    if field.contains([DELIMITER, '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
