//! Request Log - bounded in-memory history of captured records
//!
//! Backs the dashboard's request table. Oldest records are evicted once the
//! capacity is reached.

use std::collections::VecDeque;

use parking_lot::RwLock;
use serde::Deserialize;

use crate::models::CapturedRecord;

/// Filters accepted by `GET /api/requests`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
    /// Exact method, case-insensitive; `ALL` disables the filter
    pub method: Option<String>,
    /// Case-insensitive substring of the path
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl RequestFilter {
    fn matches(&self, record: &CapturedRecord) -> bool {
        let method_ok = match self.method.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(method) if method.eq_ignore_ascii_case("ALL") => true,
            Some(method) => record.method.eq_ignore_ascii_case(method),
        };

        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(search) => record
                .path
                .to_lowercase()
                .contains(&search.to_lowercase()),
        };

        method_ok && search_ok
    }
}

pub struct RequestLog {
    records: RwLock<VecDeque<CapturedRecord>>,
    capacity: usize,
}

impl RequestLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    pub fn push(&self, record: CapturedRecord) {
        if self.capacity == 0 {
            return;
        }

        let mut records = self.records.write();
        records.push_front(record);
        records.truncate(self.capacity);
    }

    /// Matching records, newest first
    pub fn list(&self, filter: &RequestFilter) -> Vec<CapturedRecord> {
        let limit = filter.limit.unwrap_or(usize::MAX);
        self.records
            .read()
            .iter()
            .filter(|record| filter.matches(record))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }
}
