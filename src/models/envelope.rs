//! Response envelope shared by every `/api` endpoint

use serde::Serialize;

/// `{"success": true, "data": ..., "count": n}`
///
/// Failures never go through this type; see `AppError`, which renders
/// `{"success": false, "error": ...}` without a `data` field.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            success: true,
            data,
            count: Some(count),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn single(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
        }
    }
}
