//! Aggregation engine

use std::collections::HashMap;

use thiserror::Error;

use super::stats::{mean, percentile, round_to};
use crate::models::{Query, RegionReport, RegionResult, TelemetryRecord};

/// Percentile reported as `p95_latency`
pub const P95: f64 = 95.0;

#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Decimal places applied to the reported statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingPolicy {
    pub latency_decimals: u32,
    pub uptime_decimals: u32,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self {
            latency_decimals: 2,
            uptime_decimals: 4,
        }
    }
}

/// Compute per-region statistics for every region in `query`.
///
/// Regions are reported in request order. A region with no records yields
/// `RegionResult::NotFound`; it is never an error. A non-finite threshold is
/// rejected.
pub fn aggregate(
    dataset: &[TelemetryRecord],
    query: &Query,
    rounding: RoundingPolicy,
) -> Result<RegionReport, AggregateError> {
    if !query.threshold_ms.is_finite() {
        return Err(AggregateError::InvalidInput(format!(
            "threshold_ms must be a finite number, got {}",
            query.threshold_ms
        )));
    }

    let groups = group_requested(dataset, &query.regions);
    let mut report = RegionReport::new();

    for region in &query.regions {
        let result = match groups.get(region.as_str()) {
            Some(records) => summarize(records, query.threshold_ms, rounding),
            None => RegionResult::not_found(region),
        };
        report.insert(region.clone(), result);
    }

    tracing::debug!(
        requested = query.regions.len(),
        reported = report.len(),
        found = report.iter().filter(|(_, r)| r.is_found()).count(),
        threshold_ms = query.threshold_ms,
        "Aggregated latency report"
    );

    Ok(report)
}

/// Index the records of the requested regions in one pass over the dataset.
fn group_requested<'a>(
    dataset: &'a [TelemetryRecord],
    regions: &[String],
) -> HashMap<&'a str, Vec<&'a TelemetryRecord>> {
    let mut groups: HashMap<&str, Vec<&TelemetryRecord>> = HashMap::new();
    if regions.is_empty() {
        return groups;
    }

    for record in dataset {
        if regions.iter().any(|r| *r == record.region) {
            groups.entry(record.region.as_str()).or_default().push(record);
        }
    }
    groups
}

fn summarize(records: &[&TelemetryRecord], threshold_ms: f64, rounding: RoundingPolicy) -> RegionResult {
    let latencies: Vec<f64> = records.iter().map(|r| r.latency_ms).collect();
    let uptimes: Vec<f64> = records.iter().map(|r| r.uptime).collect();

    // Groups are never empty here, so every statistic is defined.
    let avg_latency = mean(&latencies).unwrap_or_default();
    let p95_latency = percentile(&latencies, P95).unwrap_or_default();
    let avg_uptime = mean(&uptimes).unwrap_or_default();
    let breaches = latencies.iter().filter(|&&l| l > threshold_ms).count();

    RegionResult::Found {
        avg_latency: round_to(avg_latency, rounding.latency_decimals),
        p95_latency: round_to(p95_latency, rounding.latency_decimals),
        avg_uptime: round_to(avg_uptime, rounding.uptime_decimals),
        breaches,
    }
}
