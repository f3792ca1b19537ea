//! CLI surface and configuration layering (§6): defaults -> TOML file ->
//! environment -> CLI flags, grounded in the teacher's layered
//! `NodeConfig` (`node-runtime::container::config`) but flattened to the
//! single `risk_types::EngineConfig` this engine actually needs.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;
use risk_types::EngineConfig;

use crate::error::ConfigurationError;

/// `risk-engine` — streaming multi-chain stablecoin risk aggregator.
#[derive(Debug, Parser)]
#[command(name = "risk-engine", version, about)]
pub struct CliArgs {
    /// Comma-separated list of coin symbols to run (default: every coin in
    /// the resolved configuration).
    #[arg(long, value_delimiter = ',')]
    pub coins: Option<Vec<String>>,

    /// Comma-separated list of chain names to run (default: every chain in
    /// the resolved configuration).
    #[arg(long, value_delimiter = ',')]
    pub chains: Option<Vec<String>>,

    /// How long to run before shutting down. Omit to run until Ctrl-C.
    #[arg(long)]
    pub duration: Option<humantime_seconds::SecondsArg>,

    /// Path to a TOML file overriding the default `EngineConfig`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level / `EnvFilter` directive string.
    #[arg(long, env = "RISK_ENGINE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit JSON logs instead of the console formatter.
    #[arg(long, env = "RISK_ENGINE_JSON_LOGS")]
    pub json_logs: bool,

    /// Address the Prometheus text-exposition endpoint listens on.
    #[arg(long, env = "RISK_ENGINE_METRICS_ADDR")]
    pub metrics_addr: Option<String>,
}

/// Resolved selection of which configured coins/chains this process instance
/// actually runs pollers and monitors for.
pub struct Selection {
    pub coins: Vec<String>,
    pub chains: Vec<String>,
}

/// Assemble the engine configuration: start from [`EngineConfig::default`],
/// overlay a TOML file if `--config` was given, then validate. Environment
/// and CLI overrides for the handful of fields the CLI actually exposes are
/// applied by the caller via [`Selection`] and [`load_telemetry_config`].
pub fn load_engine_config(args: &CliArgs) -> Result<EngineConfig, ConfigurationError> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
                path: path.display().to_string(),
                source,
            })?;
            toml::from_str::<EngineConfig>(&text).map_err(|source| ConfigurationError::Parse {
                path: path.display().to_string(),
                source,
            })?
        }
        None => EngineConfig::default(),
    };

    config.validate().map_err(ConfigurationError::Invalid)?;
    Ok(config)
}

/// Resolve which coins/chains to actually run, validating `--coins`/`--chains`
/// against what the engine configuration defines.
pub fn resolve_selection(args: &CliArgs, config: &EngineConfig) -> Result<Selection, ConfigurationError> {
    let chains = match &args.chains {
        Some(requested) => {
            for chain in requested {
                if !config.chains.contains_key(chain) {
                    return Err(ConfigurationError::UnknownChain(chain.clone()));
                }
            }
            requested.clone()
        }
        None => config.chains.keys().cloned().collect(),
    };

    let chain_set: HashSet<&str> = chains.iter().map(|s| s.as_str()).collect();

    let coins = match &args.coins {
        Some(requested) => {
            for coin in requested {
                if !config.coins.contains_key(coin) {
                    return Err(ConfigurationError::UnknownCoin(coin.clone()));
                }
            }
            requested.clone()
        }
        None => config
            .coins
            .values()
            .filter(|c| c.chains.iter().any(|chain| chain_set.contains(chain.as_str())))
            .map(|c| c.symbol.clone())
            .collect(),
    };

    Ok(Selection { coins, chains })
}

/// Layer CLI flags over `risk_telemetry::TelemetryConfig::from_env`.
pub fn load_telemetry_config(args: &CliArgs) -> risk_telemetry::TelemetryConfig {
    let mut telemetry = risk_telemetry::TelemetryConfig::from_env();
    if let Some(level) = &args.log_level {
        telemetry.log_level = level.clone();
    }
    if args.json_logs {
        telemetry.json_logs = true;
    }
    if let Some(addr) = &args.metrics_addr {
        telemetry.metrics_addr = addr.clone();
    }
    telemetry
}

/// A tiny `FromStr` wrapper so `--duration 300` parses as a plain seconds
/// count without pulling in a full duration-parsing crate for one flag.
pub mod humantime_seconds {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy)]
    pub struct SecondsArg(pub u64);

    impl FromStr for SecondsArg {
        type Err = std::num::ParseIntError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            s.parse::<u64>().map(SecondsArg)
        }
    }
}
