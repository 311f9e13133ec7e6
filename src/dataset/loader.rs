//! CSV telemetry loader
//!
//! Expected header: `region,service,latency_ms,uptime`. Extra columns are
//! ignored and `service` may be blank. Every row is validated and the uptime
//! column is converted to a ratio according to the configured unit.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::DatasetError;
use crate::models::{TelemetryRecord, UptimeUnit};

#[derive(Debug, Deserialize)]
struct CsvRow {
    region: String,
    #[serde(default)]
    service: Option<String>,
    latency_ms: f64,
    uptime: f64,
}

/// Load and validate telemetry records from a CSV file.
pub fn load_csv_file(path: &Path, unit: UptimeUnit) -> Result<Vec<TelemetryRecord>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let records = load_csv(file, unit)?;
    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load and validate telemetry records from any CSV reader.
pub fn load_csv<R: Read>(reader: R, unit: UptimeUnit) -> Result<Vec<TelemetryRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        let row = row.map_err(|source| DatasetError::Parse { row: row_number, source })?;
        records.push(validate_row(row, row_number, unit)?);
    }

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(records)
}

fn validate_row(row: CsvRow, row_number: usize, unit: UptimeUnit) -> Result<TelemetryRecord, DatasetError> {
    let invalid = |reason: String| DatasetError::InvalidRecord { row: row_number, reason };

    if row.region.is_empty() {
        return Err(invalid("region is empty".to_string()));
    }
    if !row.latency_ms.is_finite() || row.latency_ms < 0.0 {
        return Err(invalid(format!("latency_ms must be finite and >= 0, got {}", row.latency_ms)));
    }
    if !row.uptime.is_finite() || row.uptime < 0.0 || row.uptime > unit.max_value() {
        return Err(invalid(format!(
            "uptime must be within [0, {}] for unit {}, got {}",
            unit.max_value(),
            unit,
            row.uptime
        )));
    }

    Ok(TelemetryRecord {
        region: row.region,
        service: row.service.filter(|s| !s.is_empty()),
        latency_ms: row.latency_ms,
        uptime: unit.to_ratio(row.uptime),
    })
}
