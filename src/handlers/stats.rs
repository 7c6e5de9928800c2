//! Latency statistics handlers

use axum::{extract::State, Json};

use crate::{AppState, AppResult};
use crate::logic::query::{self, EndpointLatencyView};
use crate::models::ApiResponse;

/// Per-endpoint latency, slowest average first
pub async fn latency(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<EndpointLatencyView>>>> {
    let mut stats = query::list_latency_stats(state.store.as_ref())?;
    stats.sort_by(|a, b| {
        b.avg_latency
            .total_cmp(&a.avg_latency)
            .then_with(|| a.endpoint.cmp(&b.endpoint))
    });
    Ok(Json(ApiResponse::list(stats)))
}
