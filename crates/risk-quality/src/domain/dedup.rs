//! Stage 2: deduplicate (§4.2).
//!
//! A signature -> last-seen-timestamp map with a sliding retention window.
//! The map is the caller's to own and reuse across batches (its lifetime
//! spans the whole pipeline run, not a single `deduplicate` call), mirroring
//! the rolling-cache idiom used elsewhere in this codebase for bounding
//! unbounded growth of a seen-set.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use risk_types::{QualityConfig, RiskEvent};
use uuid::Uuid;

/// Sliding-window signature cache. Records, per signature, the last-seen
/// timestamp *and* the `event_id` that set it, so that re-presenting the
/// same survivor (same event, same signature) is recognized as such rather
/// than treated as a fresh duplicate of itself (invariant 5, §8).
///
/// Not thread-safe on its own; the service wraps it in a mutex for
/// concurrent pipeline runs.
#[derive(Debug, Default)]
pub struct DedupCache {
    seen: HashMap<String, (DateTime<Utc>, Uuid)>,
}

impl DedupCache {
    pub fn new() -> Self {
        DedupCache { seen: HashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Drop entries older than the dedup window relative to `now`. Call
    /// periodically (the pipeline calls it once per batch) to bound memory.
    pub fn evict_expired(&mut self, now: DateTime<Utc>, config: &QualityConfig) {
        let window = chrono::Duration::seconds(config.dedup_window_secs);
        self.seen.retain(|_, (last_seen, _)| now - *last_seen <= window);
    }
}

fn signature(event: &RiskEvent) -> String {
    format!(
        "{}|{}|{}|{:.4}|{:.2}|{:.2}",
        event.coin,
        event.chain,
        event.source,
        event.price.unwrap_or(f64::NAN),
        event.liquidity_depth.unwrap_or(f64::NAN),
        event.volume.unwrap_or(f64::NAN),
    )
}

/// Drop events whose signature was seen within the dedup window; bump the
/// surviving event's `deduplication_count` for each duplicate folded in.
/// Idempotent given an unchanged clock (invariant 5, §8): running the same
/// batch through twice with the same `now` yields the same survivors.
pub fn deduplicate(
    events: Vec<RiskEvent>,
    cache: &mut DedupCache,
    now: DateTime<Utc>,
    config: &QualityConfig,
) -> Vec<RiskEvent> {
    cache.evict_expired(now, config);
    let window = chrono::Duration::seconds(config.dedup_window_secs);

    let mut survivors: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<RiskEvent> = Vec::with_capacity(events.len());

    for event in events {
        let sig = signature(&event);

        if let Some(&idx) = survivors.get(&sig) {
            out[idx].deduplication_count += 1;
            continue;
        }

        let cached = cache.seen.get(&sig);
        let is_self = cached.map(|(_, id)| *id == event.event_id).unwrap_or(false);
        let recently_seen = cached
            .map(|(last_seen, _)| now - *last_seen <= window)
            .unwrap_or(false);

        if recently_seen && !is_self {
            tracing::debug!(signature = %sig, "dropping duplicate event within dedup window");
            continue;
        }

        cache.seen.insert(sig.clone(), (now, event.event_id));
        survivors.insert(sig, out.len());
        out.push(event);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_types::SourceType;

    fn price_event(price: f64, ts: DateTime<Utc>) -> RiskEvent {
        let mut e = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, ts);
        e.price = Some(price);
        e
    }

    #[test]
    fn drops_duplicate_within_window() {
        let config = QualityConfig::default();
        let mut cache = DedupCache::new();
        let now = Utc::now();
        let events = vec![price_event(1.0001, now), price_event(1.0001, now)];
        let survivors = deduplicate(events, &mut cache, now, &config);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].deduplication_count, 1);
    }

    #[test]
    fn repeated_application_is_idempotent() {
        let config = QualityConfig::default();
        let mut cache = DedupCache::new();
        let now = Utc::now();
        let events = vec![price_event(1.0001, now), price_event(1.0001, now)];
        let survivors = deduplicate(events, &mut cache, now, &config);
        assert_eq!(survivors.len(), 1);

        // Re-running the surviving set through the *same* cache (the real
        // usage in `QualityPipeline::process_events`, which owns the cache
        // across calls) must be a no-op: the survivor already stamped the
        // cache, so it must not be mistaken for a fresh duplicate of itself.
        let survivors_again = deduplicate(survivors.clone(), &mut cache, now, &config);
        assert_eq!(survivors_again.len(), survivors.len());
        assert_eq!(survivors_again[0].event_id, survivors[0].event_id);
        assert_eq!(survivors_again[0].deduplication_count, survivors[0].deduplication_count);
    }

    #[test]
    fn distinct_signatures_both_survive() {
        let config = QualityConfig::default();
        let mut cache = DedupCache::new();
        let now = Utc::now();
        let events = vec![price_event(1.0001, now), price_event(1.0050, now)];
        let survivors = deduplicate(events, &mut cache, now, &config);
        assert_eq!(survivors.len(), 2);
    }
}
