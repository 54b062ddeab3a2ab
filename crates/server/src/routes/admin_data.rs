//! Admin data access.
//!
//! ```text
//! GET    /admin/data?type=<all|feedback|orders|testers|stats>&format=<json|csv>
//! DELETE /admin/data?type=<tester|feedback|order>&id=<uuid>
//! PATCH  /admin/data?type=order&id=<uuid>   {status}
//! ```
//!
//! Every call that passes authentication and query validation writes exactly
//! one audit entry, whether or not the store then succeeds.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::instrument;
use uuid::Uuid;

use imeliq_core::{DataCategory, OrderId, OrderStatus, RecordKind};

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::middleware::{ClientInfo, RequireAdminOrApiKey, RequireAdminSession};
use crate::models::{AuditAction, FeedbackStatsView};
use crate::services::csv;
use crate::state::AppState;

/// Query string shared by all `/admin/data` methods.
#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub format: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Json,
    Csv,
}

fn parse_query(
    query: std::result::Result<Query<DataQuery>, QueryRejection>,
) -> Result<DataQuery> {
    query
        .map(|Query(q)| q)
        .map_err(|e| AppError::Validation(e.body_text()))
}

fn parse_format(format: Option<&str>) -> Result<ExportFormat> {
    match format.unwrap_or("json") {
        "json" => Ok(ExportFormat::Json),
        "csv" => Ok(ExportFormat::Csv),
        other => Err(AppError::Validation(format!("invalid format: {other}"))),
    }
}

fn parse_id(id: Option<&str>) -> Result<Uuid> {
    let raw = id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("id is required".to_string()))?;
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid id: {raw}")))
}

/// Fetch records as JSON, or export one category as CSV.
#[instrument(skip_all)]
pub async fn fetch<S: RecordStore>(
    State(state): State<AppState<S>>,
    RequireAdminOrApiKey(access): RequireAdminOrApiKey,
    client: ClientInfo,
    query: std::result::Result<Query<DataQuery>, QueryRejection>,
) -> Result<Response> {
    let query = parse_query(query)?;
    let category: DataCategory = query
        .kind
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(|e: imeliq_core::CategoryError| AppError::Validation(e.to_string()))?;
    let format = parse_format(query.format.as_deref())?;

    match format {
        ExportFormat::Json => {
            state
                .audit()
                .record(
                    AuditAction::DataAccess,
                    &client,
                    json!({ "type": category.as_str(), "auth": access.as_str() }),
                )
                .await;

            let data = collect(state.store(), category).await?;
            Ok(Json(json!({
                "success": true,
                "data": data,
                "timestamp": Utc::now().to_rfc3339(),
            }))
            .into_response())
        }
        ExportFormat::Csv => export(&state, &client, category).await,
    }
}

/// Gather every part `category` includes into one JSON object.
async fn collect<S: RecordStore>(
    store: &S,
    category: DataCategory,
) -> Result<Map<String, Value>> {
    let mut data = Map::new();

    if category.includes(DataCategory::Feedback) {
        data.insert("feedback".into(), to_json(&store.list_feedback().await?)?);
    }
    if category.includes(DataCategory::Orders) {
        data.insert("orders".into(), to_json(&store.list_orders().await?)?);
    }
    if category.includes(DataCategory::Testers) {
        data.insert("testers".into(), to_json(&store.list_testers().await?)?);
    }
    if category.includes(DataCategory::Stats) {
        let stats = FeedbackStatsView::from(store.feedback_stats().await?.unwrap_or_default());
        data.insert("stats".into(), to_json(&stats)?);
    }

    Ok(data)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}

async fn export<S: RecordStore>(
    state: &AppState<S>,
    client: &ClientInfo,
    category: DataCategory,
) -> Result<Response> {
    if category == DataCategory::All {
        return Err(AppError::Validation(
            "CSV export needs a single type".to_string(),
        ));
    }

    let exported = csv::export(state.store(), category).await;

    let details = match &exported {
        Ok(export) => json!({ "type": category.as_str(), "record_count": export.record_count }),
        Err(e) => json!({ "type": category.as_str(), "error": e.to_string() }),
    };
    state
        .audit()
        .record(AuditAction::DataExport, client, details)
        .await;

    let Some(body) = exported?.body else {
        return Err(AppError::NotFound("No data".to_string()));
    };

    let disposition = format!(
        "attachment; filename={}",
        csv::file_name(category.as_str(), Utc::now().date_naive())
    );
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Permanently delete one record.
///
/// Deleting a record that no longer exists succeeds with `deleted: false`.
#[instrument(skip_all)]
pub async fn erase<S: RecordStore>(
    State(state): State<AppState<S>>,
    _session: RequireAdminSession,
    client: ClientInfo,
    query: std::result::Result<Query<DataQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let query = parse_query(query)?;
    let kind: RecordKind = query
        .kind
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: imeliq_core::CategoryError| AppError::Validation(e.to_string()))?;
    let id = parse_id(query.id.as_deref())?;

    state
        .audit()
        .record(
            AuditAction::DataDelete,
            &client,
            json!({ "type": kind.as_str(), "id": id }),
        )
        .await;

    let deleted = state.store().delete_record(kind, id).await?;
    tracing::info!(kind = %kind, %id, deleted, "Record erased");

    Ok(Json(json!({
        "success": true,
        "deleted": deleted,
    })))
}

/// Move an order forward through pending, confirmed, delivered.
#[instrument(skip_all)]
pub async fn update_status<S: RecordStore>(
    State(state): State<AppState<S>>,
    _session: RequireAdminSession,
    client: ClientInfo,
    query: std::result::Result<Query<DataQuery>, QueryRejection>,
    body: std::result::Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let query = parse_query(query)?;
    if query.kind.as_deref() != Some(RecordKind::Order.as_str()) {
        return Err(AppError::Validation(
            "only orders have a status".to_string(),
        ));
    }
    let id = OrderId::new(parse_id(query.id.as_deref())?);

    let Json(req) = body?;
    let next: OrderStatus = req
        .status
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .parse()
        .map_err(|e: imeliq_core::StatusError| AppError::Validation(e.to_string()))?;

    state
        .audit()
        .record(
            AuditAction::DataUpdate,
            &client,
            json!({ "type": "order", "id": id, "status": next.as_str() }),
        )
        .await;

    let store = state.store();
    let current = store
        .find_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    current
        .status
        .transition_to(next)
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    let updated = store
        .update_order_status(id, current.status, next)
        .await?
        .ok_or_else(|| AppError::Conflict("Order changed while updating".to_string()))?;

    tracing::info!(order_id = %id, from = %current.status, to = %next, "Order status updated");

    Ok(Json(json!({
        "success": true,
        "data": updated,
    })))
}
