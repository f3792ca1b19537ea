//! # risk-telemetry
//!
//! Ambient observability for the risk engine: structured logging
//! initialization and Prometheus metrics registration/encoding, shared by
//! every subsystem crate and wired once at orchestrator startup (§7.1).
//!
//! Grounded in the teacher's `quantum-telemetry` crate, simplified to drop
//! the OpenTelemetry/Tempo tracing export and Loki push integration: this
//! system has no distributed-tracing or log-shipping requirement, only
//! structured console/JSON logs and a Prometheus scrape endpoint.

#![warn(missing_docs)]
#![allow(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid telemetry configuration: {0}")]
    Config(String),

    #[error("failed to initialize prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and register metrics. Returns a guard that must be
/// held for the process lifetime.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let guard = logging::init_logging(config)?;
    metrics::register_metrics();
    Ok(guard)
}
