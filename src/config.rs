//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::analytics::RoundingPolicy;
use crate::models::UptimeUnit;

/// Largest accepted `LATENCY_DECIMALS` / `UPTIME_DECIMALS`. Beyond this
/// `round_to` no longer yields a finite value.
pub const MAX_DECIMALS: u32 = 15;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// CSV dataset path. `None` serves the embedded table.
    pub data_path: Option<PathBuf>,

    /// Unit of the `uptime` column in the CSV file
    pub uptime_unit: UptimeUnit,

    /// Breach threshold used when a request omits `threshold_ms`
    pub default_threshold_ms: f64,

    /// Presentation rounding of the computed statistics
    pub rounding: RoundingPolicy,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: None,
            uptime_unit: UptimeUnit::Ratio,
            default_threshold_ms: 180.0,
            rounding: RoundingPolicy::default(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_path = lookup("DATA_PATH")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let uptime_unit = match lookup("UPTIME_UNIT") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, using {}", e, defaults.uptime_unit);
                defaults.uptime_unit
            }),
            None => defaults.uptime_unit,
        };

        let default_threshold_ms = parse_or(
            &lookup,
            "DEFAULT_THRESHOLD_MS",
            defaults.default_threshold_ms,
        );
        let default_threshold_ms = if default_threshold_ms.is_finite() {
            default_threshold_ms
        } else {
            tracing::warn!("DEFAULT_THRESHOLD_MS must be finite, using {}", defaults.default_threshold_ms);
            defaults.default_threshold_ms
        };

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            data_path,
            uptime_unit,
            default_threshold_ms,
            rounding: RoundingPolicy {
                latency_decimals: parse_decimals(&lookup, "LATENCY_DECIMALS", defaults.rounding.latency_decimals),
                uptime_decimals: parse_decimals(&lookup, "UPTIME_DECIMALS", defaults.rounding.uptime_decimals),
            },
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.environment)
    }

    /// Whether `ENVIRONMENT` selects production, read ahead of `from_env`
    /// so logging is up before configuration warnings are emitted.
    pub fn production_from_env() -> bool {
        env::var("ENVIRONMENT")
            .map(|e| is_production_environment(&e))
            .unwrap_or(false)
    }
}

fn is_production_environment(environment: &str) -> bool {
    environment == "production"
}

fn parse_decimals<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    let decimals = parse_or(lookup, key, default);
    if decimals > MAX_DECIMALS {
        tracing::warn!("{} must be at most {}, using {}", key, MAX_DECIMALS, default);
        return default;
    }
    decimals
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
