//! Latency query and report models

use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

/// Upper bound on the number of regions in one request
pub const MAX_REGIONS_PER_REQUEST: u64 = 64;

/// Body of `POST /api/latency`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LatencyRequest {
    #[validate(length(max = MAX_REGIONS_PER_REQUEST))]
    pub regions: Vec<String>,
    pub threshold_ms: Option<f64>,
}

impl LatencyRequest {
    /// Resolve the request into a query, filling in the default threshold.
    pub fn into_query(self, default_threshold_ms: f64) -> Query {
        Query {
            regions: self.regions,
            threshold_ms: self.threshold_ms.unwrap_or(default_threshold_ms),
        }
    }
}

/// A resolved aggregation query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub regions: Vec<String>,
    pub threshold_ms: f64,
}

impl Query {
    #[cfg(test)]
    pub fn new<I, S>(regions: I, threshold_ms: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            threshold_ms,
        }
    }
}

/// Statistics for one requested region, or a not-found marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegionResult {
    Found {
        avg_latency: f64,
        p95_latency: f64,
        avg_uptime: f64,
        breaches: usize,
    },
    NotFound {
        #[serde(rename = "error")]
        message: String,
    },
}

impl RegionResult {
    pub fn not_found(region: &str) -> Self {
        RegionResult::NotFound {
            message: format!("Region {} not found", region),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RegionResult::Found { .. })
    }
}

/// Ordered mapping of region key to result.
///
/// Serializes as a JSON object in request order. A key inserted twice keeps
/// its first position and takes the latest value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionReport {
    entries: Vec<(String, RegionResult)>,
}

impl RegionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: String, result: RegionResult) {
        match self.entries.iter_mut().find(|(key, _)| *key == region) {
            Some((_, existing)) => *existing = result,
            None => self.entries.push((region, result)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, region: &str) -> Option<&RegionResult> {
        self.entries
            .iter()
            .find(|(key, _)| key == region)
            .map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionResult)> {
        self.entries.iter().map(|(key, result)| (key.as_str(), result))
    }
}

impl Serialize for RegionReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, result)| (key, result)))
    }
}

/// One entry of `GET /api/regions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub records: usize,
}
