//! Latency analytics handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::analytics;
use crate::models::{LatencyRequest, RegionReport, RegionSummary};

/// Service banner
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Latency Analytics API" }))
}

/// Per-region latency statistics for the requested regions
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<LatencyRequest>, JsonRejection>,
) -> AppResult<Json<RegionReport>> {
    let Json(req) = payload?;
    req.validate()?;

    let query = req.into_query(state.config.default_threshold_ms);
    let snapshot = state.datasets.snapshot()?;
    let report = analytics::aggregate(snapshot.records(), &query, state.config.rounding)?;

    Ok(Json(report))
}

/// Regions present in the current dataset
pub async fn regions(State(state): State<AppState>) -> AppResult<Json<Vec<RegionSummary>>> {
    let snapshot = state.datasets.snapshot()?;
    Ok(Json(snapshot.regions()))
}
