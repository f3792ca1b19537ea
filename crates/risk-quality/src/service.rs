//! Wires the three pipeline stages together and owns the per-source
//! circuit breakers (§4.2, §5).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use risk_types::{QualityConfig, RiskEvent};

use crate::domain::{normalize, CircuitBreaker, CircuitEvent, DedupCache};
use crate::error::{QualityError, QualityResult};

/// Runs normalize -> deduplicate -> outlier-flag over a batch, and tracks
/// per-source circuit state for the source collaborators that feed it.
pub struct QualityPipeline {
    config: QualityConfig,
    dedup: Mutex<DedupCache>,
    breakers: Mutex<HashMap<String, CircuitBreaker>>,
}

impl QualityPipeline {
    pub fn new(config: QualityConfig) -> Self {
        QualityPipeline {
            config,
            dedup: Mutex::new(DedupCache::new()),
            breakers: Mutex::new(HashMap::new()),
        }
    }

    /// Process one batch of raw events. Never raises for a single bad
    /// event (§4.2 failure semantics) — normalization is aggressive and the
    /// outlier flag carries whatever signal remains.
    pub fn process_events(&self, mut events: Vec<RiskEvent>, now: DateTime<Utc>) -> Vec<RiskEvent> {
        normalize::normalize(&mut events, &self.config);

        let mut events = {
            let mut dedup = self.dedup.lock();
            crate::domain::deduplicate(events, &mut dedup, now, &self.config)
        };

        crate::domain::flag_outliers(&mut events, &self.config);
        events
    }

    /// Whether a call to `source` should be attempted right now.
    pub fn should_attempt(&self, source: &str, now: DateTime<Utc>) -> bool {
        let mut breakers = self.breakers.lock();
        breakers
            .entry(source.to_string())
            .or_insert_with(|| CircuitBreaker::new(self.config.circuit_failure_threshold, self.config.circuit_cooldown_secs))
            .should_attempt(now)
    }

    /// Record the outcome of a source call, driving its circuit breaker.
    pub fn record_outcome(&self, source: &str, success: bool, now: DateTime<Utc>) {
        let mut breakers = self.breakers.lock();
        let breaker = breakers
            .entry(source.to_string())
            .or_insert_with(|| CircuitBreaker::new(self.config.circuit_failure_threshold, self.config.circuit_cooldown_secs));
        breaker.process_event(
            if success { CircuitEvent::Success } else { CircuitEvent::Failure },
            now,
        );
    }

    /// Guard a source call with the circuit breaker, failing fast with
    /// `CircuitOpen` rather than letting the caller retry into a known-dead
    /// source.
    pub fn guard(&self, source: &str, now: DateTime<Utc>) -> QualityResult<()> {
        if self.should_attempt(source, now) {
            Ok(())
        } else {
            Err(QualityError::CircuitOpen {
                source: source.to_string(),
                cooldown_secs: self.config.circuit_cooldown_secs,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_types::SourceType;

    fn price_event(coin: &str, price: f64, ts: DateTime<Utc>) -> RiskEvent {
        let mut e = RiskEvent::new(coin, "ethereum", "priceA", SourceType::Price, ts);
        e.price = Some(price);
        e
    }

    #[test]
    fn full_pipeline_normalizes_dedups_and_flags() {
        let pipeline = QualityPipeline::new(QualityConfig::default());
        let now = Utc::now();
        let events = vec![
            price_event("usdc", 1.0001, now),
            price_event("usdc", 1.0001, now), // duplicate, dropped
            price_event("usdc", 1.0002, now),
            price_event("usdc", 50.0, now), // outlier, retained
        ];
        let out = pipeline.process_events(events, now);
        assert_eq!(out.len(), 3);
        assert!(out.iter().any(|e| e.is_outlier));
        assert!(out.iter().all(|e| e.coin == "USDC"));
    }

    #[test]
    fn circuit_breaker_blocks_after_threshold() {
        let mut config = QualityConfig::default();
        config.circuit_failure_threshold = 2;
        let pipeline = QualityPipeline::new(config);
        let now = Utc::now();
        pipeline.record_outcome("priceA", false, now);
        pipeline.record_outcome("priceA", false, now);
        assert!(pipeline.guard("priceA", now).is_err());
    }
}
