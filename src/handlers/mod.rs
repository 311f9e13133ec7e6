//! HTTP handlers

pub mod health;
pub mod latency;
pub mod dataset;

#[cfg(test)]
mod tests;
