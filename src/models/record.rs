//! Captured request/response record

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Header value: proxies may fold repeated headers into a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

pub type HeaderMap = BTreeMap<String, HeaderValue>;

/// One observed request/response pair, as delivered by the capture layer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRecord {
    pub id: i64,
    #[serde(default)]
    pub session_id: String,
    #[validate(length(min = 1, max = 16))]
    pub method: String,
    #[validate(custom(function = "validate_path"))]
    pub path: String,
    #[validate(range(min = 100, max = 599))]
    pub status_code: u16,
    #[validate(range(min = 0.0))]
    pub duration_ms: f64,
    #[serde(default)]
    pub request_headers: HeaderMap,
    #[serde(default)]
    pub request_body: String,
    #[serde(default)]
    pub response_headers: HeaderMap,
    #[serde(default)]
    pub response_body: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default = "now_millis")]
    pub timestamp: i64,
    #[serde(default = "now_rfc3339")]
    pub created_at: String,
}

impl CapturedRecord {
    /// Minimal record for a completed exchange, stamped with the current time
    pub fn new(
        id: i64,
        method: impl Into<String>,
        path: impl Into<String>,
        status_code: u16,
        duration_ms: f64,
        response_body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            session_id: String::new(),
            method: method.into(),
            path: path.into(),
            status_code,
            duration_ms,
            request_headers: HeaderMap::new(),
            request_body: String::new(),
            response_headers: HeaderMap::new(),
            response_body: response_body.into(),
            error: None,
            timestamp: now_millis(),
            created_at: now_rfc3339(),
        }
    }
}

fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("path_must_start_with_slash"))
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_capture_payload() {
        let record: CapturedRecord = serde_json::from_value(json!({
            "id": 7,
            "sessionId": "s-1",
            "method": "GET",
            "path": "/users",
            "statusCode": 200,
            "durationMs": 12.5,
            "requestHeaders": {"accept": "application/json"},
            "responseHeaders": {"set-cookie": ["a=1", "b=2"]},
            "responseBody": "{\"id\":1}",
            "error": null,
            "timestamp": 1700000000000i64,
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.session_id, "s-1");
        assert_eq!(
            record.response_headers.get("set-cookie"),
            Some(&HeaderValue::Multiple(vec!["a=1".into(), "b=2".into()]))
        );
        assert_eq!(
            record.request_headers.get("accept"),
            Some(&HeaderValue::Single("application/json".into()))
        );
        assert!(record.request_body.is_empty());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_records() {
        let mut record = CapturedRecord::new(1, "GET", "/users", 200, 10.0, "{}");
        assert!(record.validate().is_ok());

        record.path = "users".to_string();
        assert!(record.validate().is_err());

        record.path = "/users".to_string();
        record.duration_ms = -1.0;
        assert!(record.validate().is_err());

        record.duration_ms = 1.0;
        record.method = String::new();
        assert!(record.validate().is_err());

        record.method = "GET".to_string();
        record.status_code = 42;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = CapturedRecord::new(3, "POST", "/items", 201, 5.0, "");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["durationMs"], 5.0);
        assert!(value.get("createdAt").is_some());
        assert!(value["error"].is_null());
    }
}
