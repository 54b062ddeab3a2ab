//! CSV export command.
//!
//! Writes the same file the admin API serves for
//! `GET /admin/data?type=<type>&format=csv`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use imeliq_core::DataCategory;
use imeliq_server::db::{self, PgRecordStore};
use imeliq_server::services::csv::{self, ExportError};

use super::{MissingDatabaseUrl, database_url};

#[derive(Debug, thiserror::Error)]
pub enum ExportCommandError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("No {0} records to export")]
    Empty(&'static str),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Export one category to `output`, or to the default file name.
pub async fn run(
    category: DataCategory,
    output: Option<PathBuf>,
) -> Result<(), ExportCommandError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    let store = PgRecordStore::new(pool);

    let export = csv::export(&store, category).await?;
    let body = export
        .body
        .ok_or(ExportCommandError::Empty(category.as_str()))?;

    let path = output.unwrap_or_else(|| default_path(category));
    write(&path, &body).await?;

    tracing::info!(
        category = %category,
        record_count = export.record_count,
        path = %path.display(),
        "Export written"
    );
    Ok(())
}

fn default_path(category: DataCategory) -> PathBuf {
    PathBuf::from(csv::file_name(category.as_str(), Utc::now().date_naive()))
}

async fn write(path: &Path, body: &str) -> Result<(), ExportCommandError> {
    tokio::fs::write(path, body)
        .await
        .map_err(|source| ExportCommandError::Write {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_names_category() {
        let path = default_path(DataCategory::Testers);
        let name = path.to_string_lossy();
        assert!(name.starts_with("imeliq_testers_"));
        assert!(name.ends_with(".csv"));
    }
}
