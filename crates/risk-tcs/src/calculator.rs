//! The Temporal Confidence Score (§4.3): combines finality, cross-chain
//! minimum finality, source completeness, and a staleness penalty into one
//! scalar in `[0, 1]`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use risk_types::{ConfidenceBreakdown, RiskEvent, SourceType, TcsConfig, TcsStatus};

pub struct TcsCalculator;

impl TcsCalculator {
    /// Compute the four-component breakdown and the combined score for a
    /// flat set of events. Returns the zero breakdown for an empty set
    /// (invariant 4, §8) — there is nothing to divide.
    pub fn calculate(events: &[RiskEvent], config: &TcsConfig, now: DateTime<Utc>) -> ConfidenceBreakdown {
        if events.is_empty() {
            return ConfidenceBreakdown::zero();
        }

        let finality_weight = Self::finality_weight(events, config);
        let chain_confidence = Self::chain_confidence(events);
        let completeness = Self::completeness(events, config);
        let staleness_penalty = Self::staleness_penalty(events, config, now);

        let raw = (finality_weight * chain_confidence * completeness) / staleness_penalty;
        let temporal_confidence = raw.clamp(0.0, 1.0);

        ConfidenceBreakdown {
            finality_weight,
            chain_confidence,
            completeness,
            staleness_penalty,
            temporal_confidence,
        }
    }

    /// `f`: importance-weighted mean of tier confidence across events.
    fn finality_weight(events: &[RiskEvent], config: &TcsConfig) -> f64 {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for event in events {
            let source_type = event.source_type;
            let weight = *config.source_importance.get(&source_type).unwrap_or(&1.0);
            weighted_sum += event.finality_tier.confidence() * weight;
            weight_total += weight;
        }

        if weight_total == 0.0 {
            0.0
        } else {
            weighted_sum / weight_total
        }
    }

    /// `c`: weakest link across chains — for each chain, the minimum event
    /// confidence within it; then the minimum across chains.
    pub fn chain_confidence(events: &[RiskEvent]) -> f64 {
        let mut per_chain_min: HashMap<&str, f64> = HashMap::new();
        for event in events {
            let confidence = event.finality_tier.confidence();
            per_chain_min
                .entry(event.chain.as_str())
                .and_modify(|min| *min = min.min(confidence))
                .or_insert(confidence);
        }
        per_chain_min.values().cloned().fold(f64::INFINITY, f64::min)
    }

    /// `k`: fraction of the expected source-type set actually present.
    fn completeness(events: &[RiskEvent], config: &TcsConfig) -> f64 {
        if config.expected_source_types.is_empty() {
            return 1.0;
        }
        let present: std::collections::HashSet<SourceType> = events.iter().map(|e| e.source_type).collect();
        let matched = config
            .expected_source_types
            .iter()
            .filter(|expected| present.contains(expected))
            .count();
        matched as f64 / config.expected_source_types.len() as f64
    }

    /// `s`: staleness penalty from the age of the *oldest* event.
    fn staleness_penalty(events: &[RiskEvent], config: &TcsConfig, now: DateTime<Utc>) -> f64 {
        let oldest_age = events
            .iter()
            .map(|e| (now - e.timestamp).num_seconds())
            .max()
            .unwrap_or(0);

        if oldest_age < config.fresh_secs {
            1.0
        } else if oldest_age < config.acceptable_secs {
            0.9
        } else {
            0.7
        }
    }

    pub fn status(tcs: f64) -> TcsStatus {
        TcsStatus::from_score(tcs)
    }

    pub fn should_attest(tcs: f64, config: &TcsConfig) -> bool {
        tcs >= config.attestation_threshold
    }
}
