//! Structured logging initialization (§7.1): a single `tracing_subscriber`
//! set up once at orchestrator startup, console-formatted in development
//! and JSON-formatted when `json_logs` is set. Every component logs
//! through `tracing::{info,warn,error,debug}` spans, never `println!`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Guard returned by [`init_logging`]. Holding it keeps the subscriber
/// installed; there is nothing to flush on drop (no batched exporter, per
/// the redesign note in SPEC_FULL.md dropping OTLP/Loki).
pub struct LoggingGuard {
    _private: (),
}

/// Install the global tracing subscriber. Safe to call exactly once per
/// process; subsequent calls return an error rather than panicking, so
/// tests that each construct their own orchestrator don't abort the suite.
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let init_result = if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true);
        registry.with(json_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true);
        registry.with(fmt_layer).try_init()
    };

    if let Err(err) = init_result {
        tracing::debug!(error = %err, "tracing subscriber already installed, reusing it");
    }

    tracing::info!(service = %config.service_name, json_logs = config.json_logs, "logging initialized");
    Ok(LoggingGuard { _private: () })
}
