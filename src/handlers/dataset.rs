//! Dataset administration handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppState, AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub source: String,
    pub records: usize,
    pub regions: usize,
    pub loaded_at: i64,
}

/// Re-read the dataset source and swap in the new snapshot
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let store = Arc::clone(&state.datasets);
    let dataset = tokio::task::spawn_blocking(move || store.reload())
        .await
        .map_err(|e| AppError::InternalError(format!("Dataset reload task failed: {}", e)))??;

    Ok(Json(ReloadResponse {
        source: dataset.source().to_string(),
        records: dataset.len(),
        regions: dataset.regions().len(),
        loaded_at: dataset.loaded_at().timestamp(),
    }))
}
