//! Endpoint Aggregator - groups captured records per (method, path)
//!
//! Profiles live in a map of independently locked slots: the map lock is
//! only held to find or insert a slot, every update of a profile happens
//! under that profile's own mutex. Observations of the same endpoint are
//! serialized, different endpoints proceed in parallel.

pub mod stats;
pub mod profile;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::logic::shape::{infer_body, DEFAULT_MAX_DEPTH};
use crate::models::CapturedRecord;

pub use profile::{EndpointKey, EndpointProfile, Inconsistencies, ObserveOutcome};
pub use stats::LatencyStats;

// ============================================================================
// SETTINGS
// ============================================================================

/// Resource bounds of the aggregator
#[derive(Debug, Clone, Copy)]
pub struct AggregatorSettings {
    pub max_endpoints: usize,
    pub max_variants_per_endpoint: usize,
    pub max_shape_depth: usize,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            max_endpoints: 1000,
            max_variants_per_endpoint: 10,
            max_shape_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&Config> for AggregatorSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_endpoints: config.max_endpoints,
            max_variants_per_endpoint: config.max_variants_per_endpoint,
            max_shape_depth: config.max_shape_depth,
        }
    }
}

// ============================================================================
// AGGREGATOR
// ============================================================================

type Slot = Arc<Mutex<EndpointProfile>>;

pub struct Aggregator {
    profiles: RwLock<HashMap<EndpointKey, Slot>>,
    settings: AggregatorSettings,
}

impl Aggregator {
    pub fn new(settings: AggregatorSettings) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            settings,
        }
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    /// Fold one captured record into its endpoint profile
    pub fn observe(&self, record: &CapturedRecord) -> ObserveOutcome {
        let key = EndpointKey::from_record(record);

        let Some(slot) = self.slot(&key, record.timestamp) else {
            tracing::warn!(
                "Endpoint limit ({}) reached, dropping observation for {}",
                self.settings.max_endpoints,
                key
            );
            return ObserveOutcome::Rejected;
        };

        // Inference is pure, keep it outside the profile lock
        let shape = infer_body(&record.response_body, self.settings.max_shape_depth);

        let mut profile = slot.lock();
        profile.apply(record, shape, self.settings.max_variants_per_endpoint)
    }

    /// Find or create the slot for `key`; `None` when the endpoint limit
    /// forbids creating it.
    fn slot(&self, key: &EndpointKey, seen_at: i64) -> Option<Slot> {
        if let Some(slot) = self.profiles.read().get(key) {
            return Some(Arc::clone(slot));
        }

        let mut profiles = self.profiles.write();

        // Another writer may have inserted it between the two locks
        if let Some(slot) = profiles.get(key) {
            return Some(Arc::clone(slot));
        }

        if profiles.len() >= self.settings.max_endpoints {
            return None;
        }

        let slot = Arc::new(Mutex::new(EndpointProfile::new(key.clone(), seen_at)));
        profiles.insert(key.clone(), Arc::clone(&slot));
        tracing::info!("New endpoint tracked: {} ({} total)", key, profiles.len());
        Some(slot)
    }

    /// Consistent copy of every profile, each taken under its own lock
    pub fn snapshot(&self) -> Vec<EndpointProfile> {
        let slots: Vec<Slot> = self.profiles.read().values().cloned().collect();
        slots.iter().map(|slot| slot.lock().clone()).collect()
    }

    /// Copy of a single profile
    pub fn profile(&self, method: &str, path: &str) -> Option<EndpointProfile> {
        let key = EndpointKey::new(method, path);
        let slot = self.profiles.read().get(&key).cloned()?;
        let profile = slot.lock().clone();
        Some(profile)
    }

    pub fn endpoint_count(&self) -> usize {
        self.profiles.read().len()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AggregatorSettings::default())
    }
}
