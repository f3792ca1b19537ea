//! Telemetry configuration, layered the same way as the rest of the engine
//! configuration surface (defaults -> env -> CLI; §6), grounded in the
//! teacher's `quantum-telemetry::TelemetryConfig`.

use std::env;

/// Logging and metrics configuration for one orchestrator process.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error), or a full
    /// `EnvFilter` directive string.
    pub log_level: String,

    /// Emit logs as JSON (production/container default) instead of the
    /// human-readable console format (development default).
    pub json_logs: bool,

    /// Address the Prometheus text-exposition endpoint listens on.
    pub metrics_addr: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();
        TelemetryConfig {
            service_name: "risk-engine".to_string(),
            log_level: "info".to_string(),
            json_logs: is_container,
            metrics_addr: "0.0.0.0:9100".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Layer environment variables over the defaults. CLI flags (parsed by
    /// the orchestrator binary) are applied on top of this by the caller.
    ///
    /// Recognized variables: `RISK_ENGINE_LOG_LEVEL` (or `RUST_LOG`),
    /// `RISK_ENGINE_JSON_LOGS`, `RISK_ENGINE_METRICS_ADDR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = env::var("RISK_ENGINE_LOG_LEVEL").or_else(|_| env::var("RUST_LOG")) {
            config.log_level = level;
        }
        if let Ok(json) = env::var("RISK_ENGINE_JSON_LOGS") {
            config.json_logs = json.to_lowercase() == "true" || json == "1";
        }
        if let Ok(addr) = env::var("RISK_ENGINE_METRICS_ADDR") {
            config.metrics_addr = addr;
        }

        config
    }
}
