//! Simulated data sources.
//!
//! Concrete data-source clients (DEX subgraphs, price feeds, sentiment
//! APIs, ...) are out of scope (§6 data-source contract); these fixtures
//! are the minimal concrete [`RiskSource`] implementations the orchestrator
//! wires by default, generating plausible-looking observations around a
//! coin's peg with the jitter and occasional outlier a real feed would
//! produce, so the pipeline has something to ingest end to end.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use risk_types::{ChainRpc, RiskEvent, SourceError, SourceType};

/// An on-chain price observation: ties the event to the simulated chain's
/// current head so the block monitor and reorg handler have something to
/// invalidate when a fork is simulated.
pub struct OnChainPriceSource {
    name: String,
    rpcs: HashMap<String, Arc<dyn ChainRpc>>,
    fetch_count: AtomicU64,
}

impl OnChainPriceSource {
    pub fn new(name: impl Into<String>, rpcs: HashMap<String, Arc<dyn ChainRpc>>) -> Self {
        OnChainPriceSource {
            name: name.into(),
            rpcs,
            fetch_count: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl RiskSource for OnChainPriceSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, coin: &str, chain: &str) -> Result<Option<RiskEvent>, SourceError> {
        let Some(rpc) = self.rpcs.get(chain) else {
            return Ok(None);
        };
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        let height = rpc.current_height().await.map_err(|e| SourceError::Unavailable {
            source: self.name.clone(),
            message: e.to_string(),
        })?;

        let mut event = RiskEvent::new(coin, chain, &self.name, SourceType::Price, Utc::now());
        event.price = Some(peg_jitter());
        event.block_number = Some(height);
        Ok(Some(event))
    }
}

/// An off-chain metric observation (liquidity, supply, volatility, or
/// sentiment) with no on-chain anchor, finalized purely by event age
/// (§4.1 off-chain tiering).
pub struct OffChainMetricSource {
    name: String,
    source_type: SourceType,
    fetch_count: AtomicU64,
}

impl OffChainMetricSource {
    pub fn new(name: impl Into<String>, source_type: SourceType) -> Self {
        OffChainMetricSource {
            name: name.into(),
            source_type,
            fetch_count: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl RiskSource for OffChainMetricSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, coin: &str, chain: &str) -> Result<Option<RiskEvent>, SourceError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        let mut event = RiskEvent::new(coin, chain, &self.name, self.source_type, Utc::now());
        match self.source_type {
            SourceType::Liquidity => event.liquidity_depth = Some(liquidity_jitter()),
            SourceType::Supply => event.net_supply_change = Some(supply_jitter()),
            SourceType::Volatility => event.market_volatility = Some(volatility_jitter()),
            SourceType::Sentiment => event.sentiment_score = Some(sentiment_jitter()),
            SourceType::Price => event.price = Some(peg_jitter()),
        }
        Ok(Some(event))
    }
}

fn peg_jitter() -> f64 {
    let mut rng = rand::thread_rng();
    // Mostly tight around the $1.00 peg; an occasional wider excursion
    // exercises the outlier flag and depeg detection downstream.
    if rng.gen_bool(0.02) {
        rng.gen_range(0.80..1.20)
    } else {
        rng.gen_range(0.998..1.002)
    }
}

fn liquidity_jitter() -> f64 {
    rand::thread_rng().gen_range(5.0e6..5.0e7)
}

fn supply_jitter() -> f64 {
    rand::thread_rng().gen_range(-1.0e5..1.0e5)
}

fn volatility_jitter() -> f64 {
    rand::thread_rng().gen_range(0.0..0.03)
}

fn sentiment_jitter() -> f64 {
    rand::thread_rng().gen_range(-1.0..1.0)
}
