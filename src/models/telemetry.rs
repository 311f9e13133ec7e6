//! Telemetry record model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One latency/uptime observation for a region.
///
/// `uptime` is always a ratio in `[0, 1]`; sources reporting percentages are
/// normalized by the dataset loader before records are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub latency_ms: f64,
    pub uptime: f64,
}

impl TelemetryRecord {
    pub fn new(region: impl Into<String>, latency_ms: f64, uptime: f64) -> Self {
        Self {
            region: region.into(),
            service: None,
            latency_ms,
            uptime,
        }
    }

    #[cfg(test)]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// Unit of the uptime column in a dataset source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UptimeUnit {
    /// Already a ratio in [0, 1]
    Ratio,
    /// Percentage in [0, 100]
    Percent,
}

impl UptimeUnit {
    /// Upper bound of a valid raw value in this unit
    pub fn max_value(&self) -> f64 {
        match self {
            UptimeUnit::Ratio => 1.0,
            UptimeUnit::Percent => 100.0,
        }
    }

    /// Convert a raw value in this unit into a ratio
    pub fn to_ratio(&self, raw: f64) -> f64 {
        match self {
            UptimeUnit::Ratio => raw,
            UptimeUnit::Percent => raw / 100.0,
        }
    }
}

impl fmt::Display for UptimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UptimeUnit::Ratio => write!(f, "ratio"),
            UptimeUnit::Percent => write!(f, "percent"),
        }
    }
}

impl FromStr for UptimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ratio" => Ok(UptimeUnit::Ratio),
            "percent" | "percentage" => Ok(UptimeUnit::Percent),
            other => Err(format!("Unknown uptime unit '{}'", other)),
        }
    }
}
