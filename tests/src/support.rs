//! Deterministic fixtures shared by the scenario tests: a fixed base time
//! (no `Utc::now()` anywhere in this suite, per §8.1) and minimal
//! [`ChainRpc`] stand-ins for windows that never touch the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use risk_types::{BlockHeader, ChainProfile, ChainRpc, ChainRpcError, CoinConfig};
use risk_window::WindowManager;

/// A fixed instant every scenario anchors its timestamps to.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

/// An RPC that is never expected to be called (purely off-chain scenarios
/// still need an entry in the `rpcs` map for their chain, since the window
/// manager looks one up before deciding an event is off-chain).
pub struct UnusedRpc;

#[async_trait]
impl ChainRpc for UnusedRpc {
    async fn current_height(&self) -> Result<u64, ChainRpcError> {
        Ok(0)
    }
    async fn block_at(&self, _height: u64) -> Result<Option<BlockHeader>, ChainRpcError> {
        Ok(None)
    }
}

/// A scripted RPC with a controllable head height and an optional fork
/// starting at a given height, for reorg scenarios.
pub struct ScriptedRpc {
    pub height: AtomicU64,
    pub fork_from: Option<u64>,
}

impl ScriptedRpc {
    pub fn steady(height: u64) -> Self {
        ScriptedRpc {
            height: AtomicU64::new(height),
            fork_from: None,
        }
    }
}

#[async_trait]
impl ChainRpc for ScriptedRpc {
    async fn current_height(&self) -> Result<u64, ChainRpcError> {
        Ok(self.height.load(Ordering::SeqCst))
    }

    async fn block_at(&self, height: u64) -> Result<Option<BlockHeader>, ChainRpcError> {
        let hash = match self.fork_from {
            Some(fork_height) if height >= fork_height => format!("fork-h{height}"),
            _ => format!("h{height}"),
        };
        Ok(Some(BlockHeader {
            number: height,
            hash,
            parent_hash: format!("h{}", height.saturating_sub(1)),
            timestamp: Utc::now(),
        }))
    }
}

/// Build a `rpcs` map with one [`UnusedRpc`] per chain name, for scenarios
/// where finality is derived purely from event age.
pub fn unused_rpcs(chains: &[&str]) -> HashMap<String, Arc<dyn ChainRpc>> {
    chains
        .iter()
        .map(|c| (c.to_string(), Arc::new(UnusedRpc) as Arc<dyn ChainRpc>))
        .collect()
}

/// Build a single-chain, single-coin [`WindowManager`] with default
/// per-chain profiles, for scenarios that don't need the full engine.
pub fn window_manager_for(chains: &[&str], coin: &str) -> WindowManager {
    let mut chain_profiles = HashMap::new();
    for &chain in chains {
        let profile = match chain {
            "ethereum" => ChainProfile::ethereum(),
            "arbitrum" => ChainProfile::arbitrum(),
            "solana" => ChainProfile::solana(),
            other => panic!("no fixture profile for chain {other}"),
        };
        chain_profiles.insert(chain.to_string(), profile);
    }
    let mut coins = HashMap::new();
    coins.insert(coin.to_string(), CoinConfig::stablecoin(coin, chains));

    WindowManager::new(
        risk_types::WindowConfig::default(),
        risk_types::TcsConfig::default(),
        coins,
        chain_profiles,
    )
}
