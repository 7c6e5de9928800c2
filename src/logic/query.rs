//! Query Layer - read-only snapshots of the aggregation state
//!
//! Views serialize straight into the dashboard payloads. No ordering is
//! imposed here.

use serde::Serialize;
use thiserror::Error;

use super::aggregator::{Aggregator, EndpointProfile};
use super::shape::{FieldDiff, Shape};

// ============================================================================
// SOURCE
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can hand out a snapshot of endpoint profiles
pub trait ProfileSource: Send + Sync {
    fn profiles(&self) -> Result<Vec<EndpointProfile>, StoreError>;
}

impl ProfileSource for Aggregator {
    fn profiles(&self) -> Result<Vec<EndpointProfile>, StoreError> {
        Ok(self.snapshot())
    }
}

// ============================================================================
// VIEWS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InconsistencyView {
    pub missing_fields: Vec<FieldDiff>,
    pub type_changes: Vec<FieldDiff>,
    pub extra_fields: Vec<FieldDiff>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDiffView {
    pub method: String,
    pub path: String,
    pub total_responses: u64,
    pub inconsistencies: InconsistencyView,
    pub base_shape: Shape,
    pub variant_shapes: Vec<Shape>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointLatencyView {
    pub endpoint: String,
    pub method: String,
    pub path: String,
    pub avg_latency: f64,
    pub min_latency: f64,
    pub max_latency: f64,
    pub count: u64,
}

impl EndpointDiffView {
    fn from_profile(profile: EndpointProfile) -> Option<Self> {
        let inconsistencies = profile.inconsistencies();
        if inconsistencies.is_empty() {
            return None;
        }

        Some(Self {
            method: profile.key.method.clone(),
            path: profile.key.path.clone(),
            total_responses: profile.total_responses,
            inconsistencies: InconsistencyView {
                missing_fields: inconsistencies.missing().to_vec(),
                type_changes: inconsistencies.type_changes().to_vec(),
                extra_fields: inconsistencies.extra().to_vec(),
            },
            base_shape: profile.base_shape()?.clone(),
            variant_shapes: profile.variant_shapes().to_vec(),
        })
    }
}

impl EndpointLatencyView {
    fn from_profile(profile: &EndpointProfile) -> Option<Self> {
        let latency = profile.latency();

        Some(Self {
            endpoint: profile.key.to_string(),
            method: profile.key.method.clone(),
            path: profile.key.path.clone(),
            avg_latency: latency.average()?,
            min_latency: latency.min()?,
            max_latency: latency.max()?,
            count: latency.count(),
        })
    }
}

// ============================================================================
// QUERIES
// ============================================================================

/// Every endpoint with at least one recorded inconsistency
pub fn list_endpoint_diffs(source: &dyn ProfileSource) -> Result<Vec<EndpointDiffView>, StoreError> {
    Ok(source
        .profiles()?
        .into_iter()
        .filter_map(EndpointDiffView::from_profile)
        .collect())
}

/// Latency statistics of every endpoint observed at least once
pub fn list_latency_stats(source: &dyn ProfileSource) -> Result<Vec<EndpointLatencyView>, StoreError> {
    Ok(source
        .profiles()?
        .iter()
        .filter_map(EndpointLatencyView::from_profile)
        .collect())
}
