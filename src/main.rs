//! API Inspector Backend Server

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shape_inspector::{config::Config, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let json_logs = config.json_logs();
    let default_filter = if config.is_production() {
        "shape_inspector=info,tower_http=info"
    } else {
        "shape_inspector=debug,tower_http=debug"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("API Inspector backend starting ({})", config.environment);
    tracing::info!(
        "Limits: {} endpoints, {} variants/endpoint, depth {}, {} records",
        config.max_endpoints,
        config.max_variants_per_endpoint,
        config.max_shape_depth,
        config.max_records
    );

    // Build application state
    let state = AppState::new(config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}
