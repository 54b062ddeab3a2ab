//! Public form submissions: tester registration, feedback, pre-orders.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::{RecordStore, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::ClientInfo;
use crate::models::AuditAction;
use crate::services::email_hash;
use crate::services::intake::{
    FeedbackRequest, OrderRequest, RegisterRequest, validate_feedback, validate_order,
    validate_registration,
};
use crate::state::AppState;

/// Register a tester.
///
/// Responds 409 when the email is already registered.
#[instrument(skip_all)]
pub async fn register<S: RecordStore>(
    State(state): State<AppState<S>>,
    client: ClientInfo,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let new_tester = validate_registration(req)?;

    let tester = state
        .store()
        .insert_tester(&new_tester)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AppError::Conflict("This email is already registered".to_string())
            }
            other => AppError::Database(other),
        })?;

    state
        .audit()
        .record(
            AuditAction::TesterRegistered,
            &client,
            json!({ "email_hash": email_hash(&tester.email) }),
        )
        .await;

    tracing::info!(tester_id = %tester.id, "Tester registered");

    Ok(Json(json!({
        "success": true,
        "message": "Registration received",
        "data": tester,
    })))
}

#[instrument(skip_all)]
pub async fn submit_feedback<S: RecordStore>(
    State(state): State<AppState<S>>,
    body: std::result::Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let new_feedback = validate_feedback(req)?;

    let feedback = state.store().insert_feedback(&new_feedback).await?;
    tracing::info!(feedback_id = %feedback.id, feeling = %feedback.feeling, "Feedback saved");

    Ok(Json(json!({
        "success": true,
        "message": "Feedback saved",
        "data": feedback,
    })))
}

/// Place a pre-order. New orders are always `pending`.
#[instrument(skip_all)]
pub async fn submit_order<S: RecordStore>(
    State(state): State<AppState<S>>,
    body: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let new_order = validate_order(req)?;

    let order = state.store().insert_order(&new_order).await?;
    let total = order.total();
    tracing::info!(
        order_id = %order.id,
        quantity = order.quantity,
        total = %total,
        "Order received"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Order received",
        "data": order,
        "total": total,
    })))
}
