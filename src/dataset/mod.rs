//! Dataset module - telemetry sources and the snapshot store
//!
//! A dataset is loaded once at startup and shared as an immutable snapshot.
//! Reloading builds a complete new snapshot before swapping it in, so an
//! in-flight aggregation never sees a partial dataset.

pub mod embedded;
pub mod loader;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::models::{RegionSummary, TelemetryRecord, UptimeUnit};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV at data row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid record at data row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("Dataset contains no records")]
    Empty,
}

/// The dataset could not be loaded; queries must not be answered.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Telemetry dataset unavailable: {reason}")]
pub struct DataUnavailable {
    pub reason: String,
}

/// Where telemetry records come from
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    Embedded,
    Csv { path: PathBuf, unit: UptimeUnit },
}

impl DatasetSource {
    pub fn load(&self) -> Result<Dataset, DatasetError> {
        let records = match self {
            DatasetSource::Embedded => embedded::records(),
            DatasetSource::Csv { path, unit } => loader::load_csv_file(path, *unit)?,
        };
        Ok(Dataset::new(records, self.to_string()))
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Embedded => write!(f, "embedded"),
            DatasetSource::Csv { path, unit } => write!(f, "csv:{} ({})", path.display(), unit),
        }
    }
}

/// Immutable telemetry snapshot
#[derive(Debug)]
pub struct Dataset {
    records: Vec<TelemetryRecord>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(records: Vec<TelemetryRecord>, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Distinct regions in first-seen order, with record counts.
    pub fn regions(&self) -> Vec<RegionSummary> {
        let mut summaries: Vec<RegionSummary> = Vec::new();
        for record in &self.records {
            match summaries.iter_mut().find(|s| s.region == record.region) {
                Some(summary) => summary.records += 1,
                None => summaries.push(RegionSummary {
                    region: record.region.clone(),
                    records: 1,
                }),
            }
        }
        summaries
    }
}

#[derive(Debug)]
enum StoreState {
    Ready(Arc<Dataset>),
    Unavailable(DataUnavailable),
}

/// Holds the current dataset snapshot, or the reason there is none.
#[derive(Debug)]
pub struct DatasetStore {
    source: DatasetSource,
    state: RwLock<StoreState>,
    // Serializes reloads; readers only ever take `state`.
    reload_lock: Mutex<()>,
}

impl DatasetStore {
    /// Load `source` once. A failure is kept as the store state rather than
    /// returned, so the service can report it per request.
    pub fn open(source: DatasetSource) -> Self {
        let state = match source.load() {
            Ok(dataset) => {
                tracing::info!("Loaded {} telemetry records from {}", dataset.len(), source);
                StoreState::Ready(Arc::new(dataset))
            }
            Err(e) => {
                tracing::error!("Failed to load telemetry from {}: {}", source, e);
                StoreState::Unavailable(DataUnavailable { reason: e.to_string() })
            }
        };

        Self {
            source,
            state: RwLock::new(state),
            reload_lock: Mutex::new(()),
        }
    }

    /// Store wrapping an already-built dataset.
    #[cfg(test)]
    pub fn from_dataset(source: DatasetSource, dataset: Dataset) -> Self {
        Self {
            source,
            state: RwLock::new(StoreState::Ready(Arc::new(dataset))),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Current snapshot. The lock is released before the caller uses it.
    pub fn snapshot(&self) -> Result<Arc<Dataset>, DataUnavailable> {
        match &*self.state.read() {
            StoreState::Ready(dataset) => Ok(Arc::clone(dataset)),
            StoreState::Unavailable(err) => Err(err.clone()),
        }
    }

    /// Re-read the source and swap in the new snapshot.
    ///
    /// On failure a previously loaded snapshot stays in service. Concurrent
    /// reloads run one at a time, so the last one to finish read the newest
    /// file.
    pub fn reload(&self) -> Result<Arc<Dataset>, DatasetError> {
        let _reloading = self.reload_lock.lock();
        match self.source.load() {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                *self.state.write() = StoreState::Ready(Arc::clone(&dataset));
                tracing::info!("Reloaded {} telemetry records from {}", dataset.len(), self.source);
                Ok(dataset)
            }
            Err(e) => {
                let mut state = self.state.write();
                if matches!(*state, StoreState::Unavailable(_)) {
                    *state = StoreState::Unavailable(DataUnavailable { reason: e.to_string() });
                } else {
                    tracing::warn!("Reload of {} failed, keeping previous snapshot: {}", self.source, e);
                }
                Err(e)
            }
        }
    }
}
