//! Per-chain grouping (§4.6): the shape the aggregator consumes, instead of
//! re-deriving "events for chain X" ad hoc at each step.

use chrono::{DateTime, Utc};
use risk_types::{FinalityTier, RiskEvent};

/// One chain's contribution to a window being aggregated.
#[derive(Debug, Clone)]
pub struct ChainEventBatch {
    pub chain: String,
    pub events: Vec<RiskEvent>,
    pub min_finality_tier: FinalityTier,
    pub chain_confidence: f64,
    pub latest_timestamp: DateTime<Utc>,
}

impl ChainEventBatch {
    fn from_events(chain: String, events: Vec<RiskEvent>) -> Self {
        let min_finality_tier = events
            .iter()
            .map(|e| e.finality_tier)
            .min()
            .unwrap_or(FinalityTier::Tier1);
        let chain_confidence = events
            .iter()
            .map(|e| e.finality_tier.confidence())
            .fold(f64::INFINITY, f64::min);
        let latest_timestamp = events
            .iter()
            .map(|e| e.timestamp)
            .max()
            .unwrap_or_else(Utc::now);
        ChainEventBatch {
            chain,
            events,
            min_finality_tier,
            chain_confidence,
            latest_timestamp,
        }
    }

    /// Every event in this batch has reached at least TIER2.
    pub fn meets_tier2(&self) -> bool {
        self.events.iter().all(|e| e.finality_tier >= FinalityTier::Tier2)
    }
}

/// Group a flat event set by chain.
pub fn group_by_chain(events: &[RiskEvent]) -> Vec<ChainEventBatch> {
    use std::collections::BTreeMap;
    let mut grouped: BTreeMap<String, Vec<RiskEvent>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.chain.clone()).or_default().push(event.clone());
    }
    grouped
        .into_iter()
        .map(|(chain, events)| ChainEventBatch::from_events(chain, events))
        .collect()
}
