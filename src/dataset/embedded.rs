//! Built-in sample telemetry
//!
//! Ten observations per region for the canonical region keys `apac`, `emea`
//! and `americas`. Uptime is a ratio.

use crate::models::TelemetryRecord;

/// Canonical region keys of the built-in table
pub const REGIONS: [&str; 3] = ["apac", "emea", "americas"];

const SAMPLES: &[(&str, &[f64], &[f64])] = &[
    (
        REGIONS[0],
        &[120.0, 145.0, 178.0, 190.0, 156.0, 167.0, 189.0, 201.0, 134.0, 188.0],
        &[0.99, 0.98, 1.0, 0.97, 0.99, 0.98, 0.96, 0.99, 1.0, 0.98],
    ),
    (
        REGIONS[1],
        &[98.0, 134.0, 156.0, 187.0, 145.0, 178.0, 201.0, 167.0, 123.0, 145.0],
        &[0.99, 1.0, 0.98, 0.99, 0.97, 0.99, 0.98, 1.0, 0.99, 0.98],
    ),
    (
        REGIONS[2],
        &[87.0, 123.0, 145.0, 167.0, 134.0, 156.0, 178.0, 145.0, 112.0, 134.0],
        &[1.0, 0.99, 0.98, 0.99, 1.0, 0.98, 0.97, 0.99, 1.0, 0.98],
    ),
];

/// Materialize the built-in table as telemetry records.
pub fn records() -> Vec<TelemetryRecord> {
    SAMPLES
        .iter()
        .flat_map(|(region, latencies, uptimes)| {
            latencies
                .iter()
                .zip(uptimes.iter())
                .map(move |(&latency_ms, &uptime)| TelemetryRecord::new(*region, latency_ms, uptime))
        })
        .collect()
}
