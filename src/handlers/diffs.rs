//! Shape drift handlers

use axum::{extract::State, Json};

use crate::{AppState, AppResult};
use crate::logic::query::{self, EndpointDiffView};
use crate::models::ApiResponse;

/// Endpoints whose responses drifted from their base shape
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<EndpointDiffView>>>> {
    let mut diffs = query::list_endpoint_diffs(state.store.as_ref())?;
    diffs.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
    Ok(Json(ApiResponse::list(diffs)))
}
