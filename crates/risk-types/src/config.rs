//! The configuration surface recognized by every component (§6). One
//! `EngineConfig` is built once at startup (defaults -> file -> env -> CLI)
//! and handed to services as an `Arc`; nothing here is a global singleton.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::SourceType;

/// Per-chain finality and transport parameters (§4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainProfile {
    pub name: String,
    pub block_time_ms: u64,
    /// Confirmation thresholds for TIER1 / TIER2 / TIER3.
    pub c1: u64,
    pub c2: u64,
    pub c3: u64,
    /// Off-chain event age thresholds (seconds) for TIER1 / TIER2 / TIER3.
    pub t1: u64,
    pub t2: u64,
    pub t3: u64,
    pub max_reorg_depth: u64,
    pub reorg_probability: f64,
    pub rpc_primary: String,
    pub rpc_fallbacks: Vec<String>,
}

impl ChainProfile {
    pub fn finality_time_secs(&self) -> u64 {
        self.t3
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        match self.name.as_str() {
            "ethereum" => std::time::Duration::from_secs(3),
            "arbitrum" => std::time::Duration::from_millis(500),
            "solana" => std::time::Duration::from_millis(400),
            _ => std::time::Duration::from_millis(self.block_time_ms),
        }
    }

    pub fn ethereum() -> Self {
        ChainProfile {
            name: "ethereum".into(),
            block_time_ms: 12_000,
            c1: 1,
            c2: 32,
            c3: 64,
            t1: 12,
            t2: 384,
            t3: 768,
            max_reorg_depth: 64,
            reorg_probability: 0.001,
            rpc_primary: "https://eth.example/rpc".into(),
            rpc_fallbacks: Vec::new(),
        }
    }

    pub fn arbitrum() -> Self {
        ChainProfile {
            name: "arbitrum".into(),
            block_time_ms: 250,
            c1: 1,
            c2: 50,
            c3: 256,
            t1: 1,
            t2: 13,
            t3: 900,
            max_reorg_depth: 256,
            reorg_probability: 0.0005,
            rpc_primary: "https://arb.example/rpc".into(),
            rpc_fallbacks: Vec::new(),
        }
    }

    pub fn solana() -> Self {
        ChainProfile {
            name: "solana".into(),
            block_time_ms: 400,
            c1: 1,
            c2: 32,
            c3: 300,
            t1: 1,
            t2: 13,
            t3: 120,
            max_reorg_depth: 300,
            reorg_probability: 0.002,
            rpc_primary: "https://solana.example/rpc".into(),
            rpc_fallbacks: Vec::new(),
        }
    }
}

/// Per-coin catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinConfig {
    pub symbol: String,
    pub name: String,
    pub chains: Vec<String>,
    pub contract_addresses: HashMap<String, String>,
    pub decimals: u8,
    pub depeg_threshold: f64,
    pub liquidity_min: f64,
    pub volatility_max: f64,
}

impl CoinConfig {
    pub fn stablecoin(symbol: &str, chains: &[&str]) -> Self {
        CoinConfig {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            chains: chains.iter().map(|c| c.to_string()).collect(),
            contract_addresses: HashMap::new(),
            decimals: 6,
            depeg_threshold: 0.02,
            liquidity_min: 1e6,
            volatility_max: 0.05,
        }
    }
}

/// TCS calculator configuration (§4.3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcsConfig {
    pub expected_source_types: Vec<SourceType>,
    pub source_importance: HashMap<SourceType, f64>,
    pub fresh_secs: i64,
    pub acceptable_secs: i64,
    pub attestation_threshold: f64,
    pub cross_chain_grace_secs: i64,
}

impl Default for TcsConfig {
    fn default() -> Self {
        let mut source_importance = HashMap::new();
        source_importance.insert(SourceType::Price, 1.0);
        source_importance.insert(SourceType::Supply, 0.9);
        source_importance.insert(SourceType::Liquidity, 0.8);
        source_importance.insert(SourceType::Volatility, 0.7);
        source_importance.insert(SourceType::Sentiment, 0.5);
        TcsConfig {
            expected_source_types: SourceType::all().to_vec(),
            source_importance,
            fresh_secs: 300,
            acceptable_secs: 600,
            attestation_threshold: 0.8,
            cross_chain_grace_secs: 900,
        }
    }
}

/// Window manager configuration (§4.7, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub size_secs: i64,
    pub provisional_delay_secs: i64,
    pub finalization_delay_secs: i64,
    pub reorg_grace_secs: i64,
    pub max_events_per_window: usize,
    pub retention_hours: i64,
    pub scheduler_tick_secs: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            size_secs: 300,
            provisional_delay_secs: 60,
            finalization_delay_secs: 900,
            reorg_grace_secs: 300,
            max_events_per_window: 10_000,
            retention_hours: 24,
            scheduler_tick_secs: 10,
        }
    }
}

/// Data-quality pipeline configuration (§4.2, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    pub z_threshold: f64,
    pub price_min: f64,
    pub price_max: f64,
    pub dedup_window_secs: i64,
    pub max_retries: u32,
    pub retry_base: f64,
    pub circuit_failure_threshold: u32,
    pub circuit_cooldown_secs: i64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        QualityConfig {
            z_threshold: 3.0,
            price_min: 0.95,
            price_max: 1.05,
            dedup_window_secs: 60,
            max_retries: 3,
            retry_base: 2.0,
            circuit_failure_threshold: 10,
            circuit_cooldown_secs: 300,
        }
    }
}

/// Top-level engine configuration, assembled once at startup by layering
/// defaults, an optional TOML file, environment variables, and CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub chains: HashMap<String, ChainProfile>,
    pub coins: HashMap<String, CoinConfig>,
    pub tcs: TcsConfig,
    pub window: WindowConfig,
    pub quality: QualityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut chains = HashMap::new();
        chains.insert("ethereum".to_string(), ChainProfile::ethereum());
        chains.insert("arbitrum".to_string(), ChainProfile::arbitrum());
        chains.insert("solana".to_string(), ChainProfile::solana());

        let mut coins = HashMap::new();
        coins.insert(
            "USDC".to_string(),
            CoinConfig::stablecoin("USDC", &["ethereum", "arbitrum", "solana"]),
        );
        coins.insert(
            "USDT".to_string(),
            CoinConfig::stablecoin("USDT", &["ethereum", "arbitrum"]),
        );
        coins.insert("DAI".to_string(), CoinConfig::stablecoin("DAI", &["ethereum"]));

        EngineConfig {
            chains,
            coins,
            tcs: TcsConfig::default(),
            window: WindowConfig::default(),
            quality: QualityConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Validate cross-references between chains and coins; called at
    /// startup so a typo surfaces as a `ConfigurationError`, not a panic
    /// deep inside the pipeline.
    pub fn validate(&self) -> Result<(), String> {
        for coin in self.coins.values() {
            for chain in &coin.chains {
                if !self.chains.contains_key(chain) {
                    return Err(format!(
                        "coin {} references unknown chain {}",
                        coin.symbol, chain
                    ));
                }
            }
        }
        for profile in self.chains.values() {
            if profile.rpc_primary.is_empty() {
                return Err(format!("chain {} missing rpc_primary", profile.name));
            }
        }
        Ok(())
    }
}
