//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::logic::query::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Ingestion errors
    #[error("validation failed: {0}")]
    Validation(String),

    // Query errors
    #[error(transparent)]
    Store(#[from] StoreError),

    // Generic errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(msg) => {
                tracing::warn!("Rejected captured record: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Store(err) => {
                tracing::error!("Store error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Aggregation state unavailable".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
