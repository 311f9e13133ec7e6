//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    dataset: DatasetHealth,
}

#[derive(Serialize)]
pub struct DatasetHealth {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loaded_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let source = state.datasets.source().to_string();

    let (status, dataset) = match state.datasets.snapshot() {
        Ok(snapshot) => (
            "healthy",
            DatasetHealth {
                source,
                records: Some(snapshot.len()),
                loaded_at: Some(snapshot.loaded_at().timestamp()),
                error: None,
            },
        ),
        Err(e) => (
            "degraded",
            DatasetHealth {
                source,
                records: None,
                loaded_at: None,
                error: Some(e.reason),
            },
        ),
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        dataset,
    })
}
