//! Data models

pub mod telemetry;
pub mod latency;

pub use telemetry::*;
pub use latency::*;
