//! Captured request handlers

use axum::{extract::{State, Query}, Json};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::logic::aggregator::ObserveOutcome;
use crate::logic::request_log::RequestFilter;
use crate::models::{ApiResponse, CapturedRecord};

/// List recent captured requests, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<RequestFilter>,
) -> AppResult<Json<ApiResponse<Vec<CapturedRecord>>>> {
    let records = state.requests.list(&filter);
    Ok(Json(ApiResponse::list(records)))
}

/// Ingest one captured request/response pair from the capture layer
pub async fn ingest(
    State(state): State<AppState>,
    Json(record): Json<CapturedRecord>,
) -> AppResult<Json<ApiResponse<ObserveOutcome>>> {
    record.validate()?;

    let outcome = state.aggregator.observe(&record);
    tracing::debug!(
        "Observed {} {} ({} in {:.1}ms): {:?}",
        record.method,
        record.path,
        record.status_code,
        record.duration_ms,
        outcome
    );

    state.requests.push(record);

    Ok(Json(ApiResponse::single(outcome)))
}
