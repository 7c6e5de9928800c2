//! API Inspector Backend
//!
//! Analytics core behind the reverse-proxy inspection dashboard. Captured
//! request/response records are folded into per-endpoint profiles that
//! track response shape drift and latency.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    API INSPECTOR BACKEND                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  capture layer ──► POST /api/requests                       │
//! │                        │                                    │
//! │         ┌──────────────┴───────────────┐                    │
//! │         ▼                              ▼                    │
//! │  ┌─────────────────┐          ┌──────────────────┐          │
//! │  │ Aggregator      │          │ Request Log      │          │
//! │  │ infer ► diff    │          │ (bounded, FIFO)  │          │
//! │  │ latency stats   │          └────────┬─────────┘          │
//! │  └────────┬────────┘                   │                    │
//! │           ▼                            ▼                    │
//! │  Query Layer ─► /api/diffs      /api/requests               │
//! │              └► /api/stats/latency                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

use config::Config;
use logic::aggregator::{Aggregator, AggregatorSettings};
use logic::query::ProfileSource;
use logic::request_log::RequestLog;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub requests: Arc<RequestLog>,
    /// Read side used by the Query Layer
    pub store: Arc<dyn ProfileSource>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let aggregator = Arc::new(Aggregator::new(AggregatorSettings::from(&config)));
        let store: Arc<dyn ProfileSource> = aggregator.clone();
        Self::with_store(config, aggregator, store)
    }

    /// State whose queries read from `store` instead of the aggregator
    pub fn with_store(
        config: Config,
        aggregator: Arc<Aggregator>,
        store: Arc<dyn ProfileSource>,
    ) -> Self {
        Self {
            aggregator,
            requests: Arc::new(RequestLog::new(config.max_records)),
            store,
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route(
            "/api/requests",
            get(handlers::requests::list).post(handlers::requests::ingest),
        )
        .route("/api/diffs", get(handlers::diffs::list))
        .route("/api/stats/latency", get(handlers::stats::latency))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
