//! Reorg handling (§4.5): invalidate affected events, correct them from an
//! already-resolved replacement set when one exists, and keep a per-chain
//! reorg log. Synchronous and pure beyond the version map and the log —
//! fetching replacements is the block monitor's job, not this crate's
//! (§9 Open Question resolution).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use risk_types::RiskEvent;
use uuid::Uuid;

/// One recorded reorganization, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct ReorgRecord {
    pub chain: String,
    pub timestamp: DateTime<Utc>,
    pub original_block: u64,
    pub new_block: Option<u64>,
    pub depth: u64,
    pub affected_event_ids: Vec<Uuid>,
}

/// Owns the event-version counters and per-chain reorg log across calls.
pub struct ReorgHandler {
    versions: Mutex<HashMap<Uuid, u64>>,
    log: Mutex<HashMap<String, Vec<ReorgRecord>>>,
}

impl Default for ReorgHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReorgHandler {
    pub fn new() -> Self {
        ReorgHandler {
            versions: Mutex::new(HashMap::new()),
            log: Mutex::new(HashMap::new()),
        }
    }

    /// Process one reorg: invalidate `affected_events` in place, and return
    /// correction events for any that matched a replacement. `fork_point` is
    /// the last height both chains agreed on; `detected_height` is where the
    /// mismatch was first observed.
    pub fn handle_reorg(
        &self,
        chain: &str,
        affected_events: &mut [RiskEvent],
        replacements: Option<&[RiskEvent]>,
        fork_point: u64,
        detected_height: u64,
        now: DateTime<Utc>,
    ) -> Vec<RiskEvent> {
        let mut corrections = Vec::new();
        let mut affected_ids = Vec::with_capacity(affected_events.len());

        for old_event in affected_events.iter_mut() {
            old_event.invalidated = true;
            old_event.reorg_detected_at = Some(now);
            affected_ids.push(old_event.event_id);

            let replacement = replacements.and_then(|reps| find_replacement(old_event, reps));

            match replacement {
                Some(replacement) => {
                    let correction = self.create_correction_event(old_event, replacement);
                    old_event.replacement_event_id = Some(correction.event_id);
                    corrections.push(correction);
                }
                None => {
                    old_event.replacement_event_id = None;
                }
            }
        }

        let record = ReorgRecord {
            chain: chain.to_string(),
            timestamp: now,
            original_block: fork_point + 1,
            new_block: replacements.and_then(|r| r.first()).and_then(|e| e.block_number),
            depth: detected_height.saturating_sub(fork_point),
            affected_event_ids: affected_ids,
        };
        self.log.lock().entry(chain.to_string()).or_default().push(record);

        corrections
    }

    /// Build the correction event: same `event_id` as `old_event`, an
    /// incremented version, payload and block fields from `replacement`.
    fn create_correction_event(&self, old_event: &RiskEvent, replacement: &RiskEvent) -> RiskEvent {
        let mut versions = self.versions.lock();
        let current_version = *versions.get(&old_event.event_id).unwrap_or(&old_event.event_version);
        let new_version = current_version + 1;
        versions.insert(old_event.event_id, new_version);

        let mut correction = replacement.clone();
        correction.event_id = old_event.event_id;
        correction.event_version = new_version;
        correction.is_finalized = false;
        correction.invalidated = false;
        correction.original_block_number = old_event.block_number;
        correction.replacement_event_id = None;
        correction.reorg_detected_at = None;
        correction
    }

    pub fn stats(&self, chain: &str) -> ReorgStats {
        let log = self.log.lock();
        let records = log.get(chain).map(|v| v.as_slice()).unwrap_or(&[]);
        ReorgStats {
            reorg_count: records.len(),
            total_affected_events: records.iter().map(|r| r.affected_event_ids.len()).sum(),
            max_depth: records.iter().map(|r| r.depth).max().unwrap_or(0),
        }
    }

    /// Whether a consumer should defer using `event` pending more
    /// confirmations (§4.5).
    pub fn should_wait_for_finality(event: &RiskEvent, min_confirmations: u64) -> bool {
        if event.block_number.is_none() {
            return false;
        }
        if event.is_finalized {
            return false;
        }
        event.confirmation_count.unwrap_or(0) < min_confirmations
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReorgStats {
    pub reorg_count: usize,
    pub total_affected_events: usize,
    pub max_depth: u64,
}

fn find_replacement<'a>(old_event: &RiskEvent, candidates: &'a [RiskEvent]) -> Option<&'a RiskEvent> {
    candidates.iter().find(|candidate| {
        candidate.coin == old_event.coin
            && candidate.source == old_event.source
            && (candidate.timestamp - old_event.timestamp).num_seconds().abs() < 60
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_types::{FinalityTier, SourceType};

    fn on_chain_event(block_number: u64, now: DateTime<Utc>) -> RiskEvent {
        let mut e = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now);
        e.price = Some(1.0);
        e.block_number = Some(block_number);
        e.confirmation_count = Some(5);
        e
    }

    #[test]
    fn invalidates_and_corrects_when_replacement_found() {
        let handler = ReorgHandler::new();
        let now = Utc::now();
        let mut affected = vec![on_chain_event(100, now)];
        let old_id = affected[0].event_id;

        let mut replacement = on_chain_event(101, now);
        replacement.price = Some(1.02);

        let corrections = handler.handle_reorg("ethereum", &mut affected, Some(&[replacement]), 99, 100, now);

        assert!(affected[0].invalidated);
        assert_eq!(affected[0].replacement_event_id, Some(old_id));
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].event_id, old_id);
        assert_eq!(corrections[0].event_version, 2);
        assert_eq!(corrections[0].price, Some(1.02));
        assert!(!corrections[0].is_finalized);
        assert_eq!(corrections[0].original_block_number, Some(100));
    }

    #[test]
    fn no_replacement_leaves_event_pruned() {
        let handler = ReorgHandler::new();
        let now = Utc::now();
        let mut affected = vec![on_chain_event(100, now)];
        let corrections = handler.handle_reorg("ethereum", &mut affected, None, 99, 100, now);
        assert!(affected[0].invalidated);
        assert_eq!(affected[0].replacement_event_id, None);
        assert!(corrections.is_empty());
    }

    #[test]
    fn replacement_match_requires_timestamp_proximity() {
        let handler = ReorgHandler::new();
        let now = Utc::now();
        let mut affected = vec![on_chain_event(100, now)];
        let far_replacement = {
            let mut r = on_chain_event(101, now + chrono::Duration::seconds(120));
            r.price = Some(2.0);
            r
        };
        let corrections = handler.handle_reorg("ethereum", &mut affected, Some(&[far_replacement]), 99, 100, now);
        assert!(corrections.is_empty());
        assert_eq!(affected[0].replacement_event_id, None);
    }

    #[test]
    fn repeated_reorgs_increment_version_monotonically() {
        let handler = ReorgHandler::new();
        let now = Utc::now();
        let mut affected = vec![on_chain_event(100, now)];
        let replacement_1 = {
            let mut r = on_chain_event(101, now);
            r.price = Some(1.01);
            r
        };
        let corrections_1 = handler.handle_reorg("ethereum", &mut affected, Some(&[replacement_1]), 99, 100, now);
        assert_eq!(corrections_1[0].event_version, 2);

        let mut affected_again = vec![corrections_1[0].clone()];
        let replacement_2 = {
            let mut r = on_chain_event(102, now);
            r.price = Some(1.02);
            r
        };
        let corrections_2 = handler.handle_reorg("ethereum", &mut affected_again, Some(&[replacement_2]), 100, 101, now);
        assert_eq!(corrections_2[0].event_version, 3);
    }

    #[test]
    fn stats_accumulate_across_chains() {
        let handler = ReorgHandler::new();
        let now = Utc::now();
        let mut affected = vec![on_chain_event(100, now), on_chain_event(101, now)];
        handler.handle_reorg("ethereum", &mut affected, None, 99, 101, now);
        let stats = handler.stats("ethereum");
        assert_eq!(stats.reorg_count, 1);
        assert_eq!(stats.total_affected_events, 2);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(handler.stats("solana").reorg_count, 0);
    }

    #[test]
    fn should_wait_for_finality_below_min_confirmations() {
        let now = Utc::now();
        let mut event = on_chain_event(100, now);
        event.finality_tier = FinalityTier::Tier1;
        assert!(ReorgHandler::should_wait_for_finality(&event, 12));
        event.confirmation_count = Some(20);
        assert!(!ReorgHandler::should_wait_for_finality(&event, 12));
    }

    #[test]
    fn offchain_events_never_wait() {
        let now = Utc::now();
        let event = RiskEvent::new("USDC", "ethereum", "sentimentA", SourceType::Sentiment, now);
        assert!(!ReorgHandler::should_wait_for_finality(&event, 12));
    }
}
