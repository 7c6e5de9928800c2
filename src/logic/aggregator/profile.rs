//! Per-endpoint aggregation state

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::stats::LatencyStats;
use crate::logic::shape::{diff, DiffKind, FieldDiff, Shape};
use crate::models::CapturedRecord;

// ============================================================================
// ENDPOINT KEY
// ============================================================================

/// Literal method + literal path. `/users/1` and `/users/2` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey {
    pub method: String,
    pub path: String,
}

impl EndpointKey {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn from_record(record: &CapturedRecord) -> Self {
        Self::new(record.method.clone(), record.path.clone())
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

// ============================================================================
// OBSERVE OUTCOME
// ============================================================================

/// What a single observation did to the aggregation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ObserveOutcome {
    /// First parsed body; stored as the base shape
    Baseline,
    /// Shape matches the base
    Consistent,
    /// Shape differs from the base
    Drift {
        #[serde(rename = "newDiffs")]
        new_diffs: usize,
    },
    /// Body is not JSON; counted and timed only
    Unparsed,
    /// Endpoint limit reached; nothing recorded
    Rejected,
}

// ============================================================================
// INCONSISTENCIES
// ============================================================================

/// Field diffs accumulated across samples, deduplicated by (path, kind).
/// The first occurrence of a (path, kind) pair wins.
#[derive(Debug, Clone, Default)]
pub struct Inconsistencies {
    missing: Vec<FieldDiff>,
    type_changes: Vec<FieldDiff>,
    extra: Vec<FieldDiff>,
    seen: HashSet<(String, DiffKind)>,
}

impl Inconsistencies {
    /// Merge diffs, returning how many were not recorded before
    pub fn merge(&mut self, diffs: Vec<FieldDiff>) -> usize {
        let mut added = 0;
        for entry in diffs {
            if !self.seen.insert((entry.path().to_string(), entry.kind())) {
                continue;
            }
            match entry.kind() {
                DiffKind::Missing => self.missing.push(entry),
                DiffKind::TypeChange => self.type_changes.push(entry),
                DiffKind::Extra => self.extra.push(entry),
            }
            added += 1;
        }
        added
    }

    pub fn missing(&self) -> &[FieldDiff] {
        &self.missing
    }

    pub fn type_changes(&self) -> &[FieldDiff] {
        &self.type_changes
    }

    pub fn extra(&self) -> &[FieldDiff] {
        &self.extra
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

// ============================================================================
// ENDPOINT PROFILE
// ============================================================================

#[derive(Debug, Clone)]
pub struct EndpointProfile {
    pub key: EndpointKey,
    pub total_responses: u64,
    pub unparsed_responses: u64,
    /// Set once from the first parsed body, never replaced
    base_shape: Option<Shape>,
    variant_shapes: Vec<Shape>,
    inconsistencies: Inconsistencies,
    latency: LatencyStats,
    pub first_seen: i64,
    pub last_seen: i64,
}

impl EndpointProfile {
    pub fn new(key: EndpointKey, seen_at: i64) -> Self {
        Self {
            key,
            total_responses: 0,
            unparsed_responses: 0,
            base_shape: None,
            variant_shapes: Vec::new(),
            inconsistencies: Inconsistencies::default(),
            latency: LatencyStats::default(),
            first_seen: seen_at,
            last_seen: seen_at,
        }
    }

    /// Fold one record (with its already inferred response shape) into
    /// the profile.
    pub fn apply(
        &mut self,
        record: &CapturedRecord,
        shape: Shape,
        max_variants: usize,
    ) -> ObserveOutcome {
        self.total_responses += 1;
        self.latency.record(record.duration_ms);
        self.last_seen = self.last_seen.max(record.timestamp);

        if shape.is_unparsed() {
            self.unparsed_responses += 1;
            tracing::debug!("Unparsed response body for {} (id {})", self.key, record.id);
            return ObserveOutcome::Unparsed;
        }

        if self.base_shape.is_none() {
            tracing::info!("Base shape established for {}", self.key);
            self.base_shape = Some(shape);
            return ObserveOutcome::Baseline;
        }

        let diffs = self
            .base_shape
            .as_ref()
            .map(|base| diff(base, &shape))
            .unwrap_or_default();
        if diffs.is_empty() {
            return ObserveOutcome::Consistent;
        }

        if !self.variant_shapes.contains(&shape) {
            if self.variant_shapes.len() < max_variants {
                self.variant_shapes.push(shape);
            } else {
                tracing::debug!(
                    "Variant limit ({}) reached for {}, shape not retained",
                    max_variants,
                    self.key
                );
            }
        }

        let new_diffs = self.inconsistencies.merge(diffs);
        if new_diffs > 0 {
            tracing::debug!("{} new shape inconsistencies on {}", new_diffs, self.key);
        }

        ObserveOutcome::Drift { new_diffs }
    }

    pub fn base_shape(&self) -> Option<&Shape> {
        self.base_shape.as_ref()
    }

    pub fn variant_shapes(&self) -> &[Shape] {
        &self.variant_shapes
    }

    pub fn inconsistencies(&self) -> &Inconsistencies {
        &self.inconsistencies
    }

    pub fn latency(&self) -> &LatencyStats {
        &self.latency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::shape::{infer_body, TypeLabel, DEFAULT_MAX_DEPTH};

    fn apply(profile: &mut EndpointProfile, body: &str, duration: f64) -> ObserveOutcome {
        let record = CapturedRecord::new(1, "GET", "/users", 200, duration, body);
        let shape = infer_body(&record.response_body, DEFAULT_MAX_DEPTH);
        profile.apply(&record, shape, 2)
    }

    fn profile() -> EndpointProfile {
        EndpointProfile::new(EndpointKey::new("GET", "/users"), 0)
    }

    #[test]
    fn test_first_parsed_body_becomes_base() {
        let mut profile = profile();
        assert_eq!(apply(&mut profile, "oops", 1.0), ObserveOutcome::Unparsed);
        assert!(profile.base_shape().is_none());

        assert_eq!(apply(&mut profile, r#"{"id":1}"#, 1.0), ObserveOutcome::Baseline);
        assert_eq!(apply(&mut profile, r#"{"id":2}"#, 1.0), ObserveOutcome::Consistent);

        assert_eq!(profile.total_responses, 3);
        assert_eq!(profile.unparsed_responses, 1);
        assert_eq!(profile.latency().count(), 3);
    }

    #[test]
    fn test_base_shape_is_never_replaced() {
        let mut profile = profile();
        apply(&mut profile, r#"{"id":1}"#, 1.0);
        apply(&mut profile, r#"{"name":"a"}"#, 1.0);
        apply(&mut profile, r#"{"name":"b"}"#, 1.0);

        assert_eq!(
            profile.base_shape().unwrap().to_template(),
            serde_json::json!({"id": "number"})
        );
    }

    #[test]
    fn test_drift_deduplicates() {
        let mut profile = profile();
        apply(&mut profile, r#"{"id":1,"name":"a"}"#, 1.0);

        assert_eq!(
            apply(&mut profile, r#"{"id":2}"#, 1.0),
            ObserveOutcome::Drift { new_diffs: 1 }
        );
        assert_eq!(
            apply(&mut profile, r#"{"id":3}"#, 1.0),
            ObserveOutcome::Drift { new_diffs: 0 }
        );

        assert_eq!(profile.variant_shapes().len(), 1);
        assert_eq!(profile.inconsistencies().len(), 1);
        assert_eq!(
            profile.inconsistencies().missing()[0].expected_type(),
            Some(TypeLabel::String)
        );
    }

    #[test]
    fn test_variant_cap() {
        let mut profile = profile();
        apply(&mut profile, r#"{"id":1}"#, 1.0);
        apply(&mut profile, r#"{"id":1,"a":1}"#, 1.0);
        apply(&mut profile, r#"{"id":1,"b":1}"#, 1.0);
        apply(&mut profile, r#"{"id":1,"c":1}"#, 1.0);

        assert_eq!(profile.variant_shapes().len(), 2);
        // Diffs are still tracked past the variant cap
        assert_eq!(profile.inconsistencies().extra().len(), 3);
    }

    #[test]
    fn test_inconsistencies_keyed_by_path_and_kind() {
        let mut set = Inconsistencies::default();
        let added = set.merge(vec![
            FieldDiff::missing("a", TypeLabel::Number),
            FieldDiff::missing("a", TypeLabel::String),
            FieldDiff::extra("a", TypeLabel::Number),
        ]);

        assert_eq!(added, 2);
        assert_eq!(set.missing().len(), 1);
        assert_eq!(set.missing()[0].expected_type(), Some(TypeLabel::Number));
        assert_eq!(set.extra().len(), 1);
        assert!(set.type_changes().is_empty());
    }
}
