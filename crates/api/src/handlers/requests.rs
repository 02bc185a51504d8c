//! Operator triage of reservation requests: listing, statistics, the two
//! terminal transitions, deletion, and retention cleanup.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use atelier_core::errors::AtelierError;
use atelier_core::models::request::{RequestStats, RequestStatus, ReservationRequest};

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<RequestStatus>,
}

/// All requests, newest first, optionally filtered to one status.
#[axum::debug_handler]
pub async fn list_requests(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ReservationRequest>>, AppError> {
    let requests = state.requests.list_requests(query.status).await?;
    Ok(Json(requests))
}

#[axum::debug_handler]
pub async fn request_stats(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<RequestStats>, AppError> {
    Ok(Json(state.requests.stats().await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveBody {
    pub processed_by: String,
    pub final_client_name: String,
}

/// Approves a pending request, then confirms the slot that was reserved at
/// creation time. The workflow record is authoritative: a slot that cannot
/// be confirmed any more (e.g. its week file was regenerated) is logged, not
/// a failure of the approval.
#[axum::debug_handler]
pub async fn approve_request(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<ApproveBody>,
) -> Result<Json<ReservationRequest>, AppError> {
    let request = state
        .requests
        .approve_request(&id, &body.processed_by, &body.final_client_name)
        .await?;

    let slot = request.slot;
    if let Err(err) = state
        .weeks
        .confirm_slot(slot.week, slot.day, slot.time)
        .await
    {
        tracing::warn!(request_id = %id, error = %err, "approved request but could not confirm the slot");
    }

    Ok(Json(request))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectBody {
    pub processed_by: String,
    #[serde(default)]
    pub reason: String,
}

/// Rejects a pending request and releases the speculative reservation.
#[axum::debug_handler]
pub async fn reject_request(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<RejectBody>,
) -> Result<Json<ReservationRequest>, AppError> {
    let request = state
        .requests
        .reject_request(&id, &body.processed_by, &body.reason)
        .await?;

    let slot = request.slot;
    if let Err(err) = state
        .weeks
        .release_slot(slot.week, slot.day, slot.time)
        .await
    {
        tracing::warn!(request_id = %id, error = %err, "rejected request but could not release the slot");
    }

    Ok(Json(request))
}

#[axum::debug_handler]
pub async fn delete_request(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.requests.delete_request(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError(AtelierError::NotFound(format!(
            "Request {id} not found"
        ))))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupBody {
    #[serde(default)]
    pub max_age_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub removed: usize,
}

/// Deletes terminal requests older than the given (or configured) age.
#[axum::debug_handler]
pub async fn cleanup_requests(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<CleanupBody>,
) -> Result<Json<CleanupResponse>, AppError> {
    let max_age_days = body
        .max_age_days
        .unwrap_or(state.config.cleanup_max_age_days);
    let removed = state.requests.cleanup_old_requests(max_age_days).await?;
    Ok(Json(CleanupResponse { removed }))
}
