//! Region-grouped telemetry aggregation
//!
//! Pure computation over an immutable dataset snapshot: group records by
//! region, reduce each group to mean latency, p95 latency, mean uptime and
//! breach count.

pub mod stats;
mod engine;

pub use engine::{aggregate, AggregateError, RoundingPolicy};
