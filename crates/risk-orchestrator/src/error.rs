//! Orchestrator-level error surface (§7): configuration problems are fatal
//! at startup, everything else downstream is either absorbed by the
//! subsystem it occurs in or logged and skipped for one poll cycle.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("requested chain {0} is not defined in the engine configuration")]
    UnknownChain(String),

    #[error("requested coin {0} is not defined in the engine configuration")]
    UnknownCoin(String),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("telemetry initialization failed: {0}")]
    Telemetry(#[from] risk_telemetry::TelemetryError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
