//! The cross-chain aggregator (§4.6): folds per-chain batches for one
//! `(coin, window_id)` into a single [`AggregatedRiskSnapshot`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use risk_types::{
    AggregatedRiskSnapshot, AggregationLevel, ChainProfile, CoinConfig, FinalityTier, RiskEvent, TcsConfig, WindowState,
};
use risk_tcs::TcsCalculator;
use uuid::Uuid;

use super::batch::{group_by_chain, ChainEventBatch};
use super::divergence::{detect_divergence, DivergencePair};

/// Weighted aggregate of one payload field across a flat event set.
fn weighted_mean(events: &[RiskEvent], field: impl Fn(&RiskEvent) -> Option<f64>) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for event in events {
        if let Some(value) = field(event) {
            weighted_sum += value * event.quality_score;
            weight_total += event.quality_score;
        }
    }
    if weight_total == 0.0 {
        0.0
    } else {
        weighted_sum / weight_total
    }
}

fn weighted_sum(events: &[RiskEvent], field: impl Fn(&RiskEvent) -> Option<f64>) -> f64 {
    events
        .iter()
        .filter_map(|e| field(e).map(|v| v * e.quality_score))
        .sum()
}

fn weighted_max(events: &[RiskEvent], field: impl Fn(&RiskEvent) -> Option<f64>) -> f64 {
    events
        .iter()
        .filter_map(|e| field(e).map(|v| v * e.quality_score))
        .fold(0.0, f64::max)
}

/// Grace period before a cross-chain snapshot may be considered ready: the
/// TIER3 time of the *slowest* contributing chain (§4.6 step 6).
pub fn grace_period_secs(chains: &[String], profiles: &HashMap<String, ChainProfile>) -> i64 {
    chains
        .iter()
        .filter_map(|c| profiles.get(c))
        .map(|p| p.finality_time_secs() as i64)
        .max()
        .unwrap_or(0)
}

/// Whether the aggregation is ready to finalize: every contributing batch is
/// at least TIER2, and enough wall-clock time has passed since window close.
pub fn is_ready(batches: &[ChainEventBatch], window_end: DateTime<Utc>, now: DateTime<Utc>, grace_secs: i64) -> bool {
    let grace_elapsed = now >= window_end + chrono::Duration::seconds(grace_secs);
    let all_tier2 = batches.iter().all(|b| b.min_finality_tier >= FinalityTier::Tier2);
    grace_elapsed && all_tier2
}

pub struct CrossChainAggregationResult {
    pub snapshot: AggregatedRiskSnapshot,
    pub divergences: Vec<DivergencePair>,
}

pub struct CrossChainAggregator;

impl CrossChainAggregator {
    /// Fold a flat event set for one `(coin, window_id)` into a snapshot.
    /// `aggregation_level` should be `CrossSource` for a single-chain window
    /// and `CrossChain` once more than one chain contributes (§4.6's
    /// single-chain degenerate case is just this function called with one
    /// batch).
    pub fn aggregate(
        coin: &CoinConfig,
        window_id: &str,
        window_state: WindowState,
        events: &[RiskEvent],
        tcs_config: &TcsConfig,
        now: DateTime<Utc>,
    ) -> CrossChainAggregationResult {
        let batches = group_by_chain(events);
        let chains: Vec<String> = batches.iter().map(|b| b.chain.clone()).collect();
        let aggregation_level = if chains.len() > 1 {
            AggregationLevel::CrossChain
        } else {
            AggregationLevel::CrossSource
        };

        // Step 1-2: breakdown over the flat set, then override chain
        // confidence with the batch-level weakest-link.
        let mut breakdown = TcsCalculator::calculate(events, tcs_config, now);
        let chain_confidence_override = batches
            .iter()
            .map(|b| b.chain_confidence)
            .fold(f64::INFINITY, f64::min);
        let chain_confidence_override = if chain_confidence_override.is_finite() {
            chain_confidence_override
        } else {
            0.0
        };
        breakdown.chain_confidence = chain_confidence_override;

        // Step 3: adjusted TCS double-discounts by chain confidence again —
        // intentional (§9): the inner min across events and this outer min
        // across chains model two different dimensions of weakest link.
        let adjusted_tcs = (breakdown.temporal_confidence * chain_confidence_override).clamp(0.0, 1.0);
        breakdown.temporal_confidence = adjusted_tcs;

        // Step 4: payload aggregation, quality_score-weighted.
        let prices: Vec<f64> = events.iter().filter_map(|e| e.price).collect();
        let avg_price = weighted_mean(events, |e| e.price);
        let min_price = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let total_liquidity = weighted_sum(events, |e| e.liquidity_depth);
        let total_volume = weighted_sum(events, |e| e.volume);
        let net_supply_change = weighted_sum(events, |e| e.net_supply_change);
        let market_volatility = weighted_max(events, |e| e.market_volatility);
        let sentiment_score = weighted_mean(events, |e| e.sentiment_score);

        // Step 5: depeg flag.
        let depeg_severity = if prices.is_empty() { 0.0 } else { (avg_price - 1.0).abs() };
        let is_depegged = !prices.is_empty() && depeg_severity >= coin.depeg_threshold;

        let divergences = detect_divergence(&batches, 0.01);

        let snapshot = AggregatedRiskSnapshot {
            snapshot_id: Uuid::new_v4(),
            timestamp: now,
            coin: coin.symbol.clone(),
            chains,
            window_id: window_id.to_string(),
            window_state,
            aggregation_level,
            avg_price: if prices.is_empty() { 0.0 } else { avg_price },
            min_price: if min_price.is_finite() { min_price } else { 0.0 },
            max_price: if max_price.is_finite() { max_price } else { 0.0 },
            total_liquidity,
            total_volume,
            net_supply_change,
            market_volatility,
            sentiment_score,
            temporal_confidence: breakdown.temporal_confidence,
            confidence_breakdown: breakdown,
            num_events_aggregated: events.len(),
            sources_included: {
                let mut sources: Vec<String> = events.iter().map(|e| e.source.clone()).collect();
                sources.sort();
                sources.dedup();
                sources
            },
            event_ids: events.iter().map(|e| e.event_id).collect(),
            is_depegged,
            depeg_severity,
        };

        CrossChainAggregationResult { snapshot, divergences }
    }
}
