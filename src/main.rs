//! Latency Analytics API
//!
//! Per-region latency and uptime statistics over a telemetry dataset.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   LATENCY ANALYTICS                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐        ┌──────────────────────────────────┐  │
//! │  │  API      │ ─────► │  Aggregation Engine              │  │
//! │  │  (Axum)   │        │  (mean / p95 / uptime / breach)  │  │
//! │  └─────┬─────┘        └────────────────┬─────────────────┘  │
//! │        │                               │ snapshot           │
//! │        ▼                               ▼                    │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │  Dataset Store (embedded table or CSV file)          │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod analytics;
mod config;
mod dataset;
mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dataset::{DatasetSource, DatasetStore};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let json_logs = config::Config::production_from_env();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "latency_analytics=debug,tower_http=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // Load configuration
    let config = config::Config::from_env();

    tracing::info!(production = config.is_production(), "Latency Analytics API starting...");

    let source = match &config.data_path {
        Some(path) => DatasetSource::Csv {
            path: path.clone(),
            unit: config.uptime_unit,
        },
        None => DatasetSource::Embedded,
    };
    tracing::info!("Dataset source: {}", source);

    // Load failures leave the store unavailable; the server still starts.
    let datasets = tokio::task::spawn_blocking(move || DatasetStore::open(source)).await?;

    // Build application state
    let state = AppState {
        datasets: Arc::new(datasets),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<DatasetStore>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::latency::root))
        .route("/health", get(handlers::health::check))
        .route("/api/latency", post(handlers::latency::analyze))
        .route("/api/regions", get(handlers::latency::regions))
        .route("/api/dataset/reload", post(handlers::dataset::reload))
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
