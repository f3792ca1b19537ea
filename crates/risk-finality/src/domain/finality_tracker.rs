//! Tier assignment for on-chain and off-chain events (§4.1).

use chrono::{DateTime, Utc};
use risk_types::{ChainProfile, ChainRpc, FinalityTier, RiskEvent};

use crate::error::{FinalityError, FinalityResult};

/// Assigns finality tiers. Stateless beyond the chain profile table: all
/// mutable state lives on the `RiskEvent` itself, so repeated application is
/// idempotent (invariant 1, §8).
pub struct FinalityTracker;

impl FinalityTracker {
    /// Refresh `event`'s finality fields in place.
    ///
    /// For on-chain events this calls the chain RPC to get the current
    /// height and to check the recorded block still exists; for off-chain
    /// events it derives the tier purely from event age.
    pub async fn update_event_finality(
        profile: &ChainProfile,
        rpc: &dyn ChainRpc,
        event: &mut RiskEvent,
        now: DateTime<Utc>,
    ) -> FinalityResult<()> {
        let Some(block_number) = event.block_number else {
            Self::update_offchain_finality(profile, event, now);
            return Ok(());
        };

        let current_height = rpc.current_height().await?;
        let still_canonical = rpc.block_at(block_number).await?.is_some();

        if !still_canonical {
            event.invalidated = true;
            event.reorg_detected_at = Some(now);
            event.original_block_number = Some(block_number);
            return Ok(());
        }

        let confirmations = current_height.saturating_sub(block_number).saturating_add(1);
        let tier = Self::tier_for_confirmations(profile, confirmations);

        event.confirmation_count = Some(confirmations);
        event.finality_tier = tier;
        event.temporal_confidence = tier.confidence();

        if tier == FinalityTier::Tier3 && !event.is_finalized {
            event.is_finalized = true;
            event.finality_timestamp = Some(now);
        }

        Ok(())
    }

    fn tier_for_confirmations(profile: &ChainProfile, confirmations: u64) -> FinalityTier {
        if confirmations >= profile.c3 {
            FinalityTier::Tier3
        } else if confirmations >= profile.c2 {
            FinalityTier::Tier2
        } else {
            FinalityTier::Tier1
        }
    }

    fn update_offchain_finality(profile: &ChainProfile, event: &mut RiskEvent, now: DateTime<Utc>) {
        let age = (now - event.timestamp).num_seconds().max(0) as u64;

        let tier = if age >= profile.t3 {
            FinalityTier::Tier3
        } else if age >= profile.t2 {
            FinalityTier::Tier2
        } else {
            FinalityTier::Tier1
        };

        event.finality_tier = tier;
        event.temporal_confidence = tier.confidence();
        if tier == FinalityTier::Tier3 && !event.is_finalized {
            event.is_finalized = true;
            event.finality_timestamp.get_or_insert(now);
        }
    }
}

/// Resolve the chain profile for an event's chain, or fail with a
/// `ConfigurationError`-flavored error the orchestrator can surface.
pub fn profile_for<'a>(
    chains: &'a std::collections::HashMap<String, ChainProfile>,
    chain: &str,
) -> FinalityResult<&'a ChainProfile> {
    chains.get(chain).ok_or_else(|| FinalityError::UnknownChain {
        chain: chain.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use risk_types::{BlockHeader, ChainRpcError, SourceType};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct FixedRpc {
        height: AtomicU64,
        exists: bool,
    }

    #[async_trait]
    impl ChainRpc for FixedRpc {
        async fn current_height(&self) -> Result<u64, ChainRpcError> {
            Ok(self.height.load(Ordering::SeqCst))
        }

        async fn block_at(&self, height: u64) -> Result<Option<BlockHeader>, ChainRpcError> {
            if self.exists {
                Ok(Some(BlockHeader {
                    number: height,
                    hash: format!("hash-{height}"),
                    parent_hash: format!("hash-{}", height.saturating_sub(1)),
                    timestamp: Utc::now(),
                }))
            } else {
                Ok(None)
            }
        }
    }

    fn on_chain_event(block_number: u64) -> RiskEvent {
        let mut e = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, Utc::now());
        e.price = Some(1.0);
        e.block_number = Some(block_number);
        e
    }

    #[tokio::test]
    async fn reaches_tier3_at_c3_confirmations() {
        let profile = ChainProfile::ethereum();
        let rpc = FixedRpc {
            height: AtomicU64::new(100 + profile.c3 - 1),
            exists: true,
        };
        let mut event = on_chain_event(100);
        FinalityTracker::update_event_finality(&profile, &rpc, &mut event, Utc::now())
            .await
            .unwrap();
        assert_eq!(event.finality_tier, FinalityTier::Tier3);
        assert!(event.is_finalized);
        assert_eq!(event.temporal_confidence, 1.0);
    }

    #[tokio::test]
    async fn tier_never_downgrades_on_transient_failure() {
        // Idempotence / monotonicity: calling twice with a non-decreasing
        // height never lowers the tier already observed.
        let profile = ChainProfile::ethereum();
        let rpc = FixedRpc {
            height: AtomicU64::new(100 + profile.c2),
            exists: true,
        };
        let mut event = on_chain_event(100);
        FinalityTracker::update_event_finality(&profile, &rpc, &mut event, Utc::now())
            .await
            .unwrap();
        assert_eq!(event.finality_tier, FinalityTier::Tier2);

        rpc.height.store(100 + profile.c3, Ordering::SeqCst);
        FinalityTracker::update_event_finality(&profile, &rpc, &mut event, Utc::now())
            .await
            .unwrap();
        assert_eq!(event.finality_tier, FinalityTier::Tier3);
    }

    #[tokio::test]
    async fn reorg_invalidates_missing_block() {
        let profile = ChainProfile::ethereum();
        let rpc = FixedRpc {
            height: AtomicU64::new(200),
            exists: false,
        };
        let mut event = on_chain_event(100);
        FinalityTracker::update_event_finality(&profile, &rpc, &mut event, Utc::now())
            .await
            .unwrap();
        assert!(event.invalidated);
        assert_eq!(event.original_block_number, Some(100));
    }

    #[test]
    fn offchain_event_tiers_by_age() {
        let profile = ChainProfile::ethereum();
        let now = Utc::now();
        let mut fresh = RiskEvent::new("USDC", "ethereum", "sentimentA", SourceType::Sentiment, now);
        fresh.sentiment_score = Some(0.2);
        FinalityTracker::update_offchain_finality(&profile, &mut fresh, now);
        assert_eq!(fresh.finality_tier, FinalityTier::Tier1);

        let mut aged = fresh.clone();
        aged.timestamp = now - Duration::seconds(profile.t3 as i64 + 1);
        FinalityTracker::update_offchain_finality(&profile, &mut aged, now);
        assert_eq!(aged.finality_tier, FinalityTier::Tier3);
        assert!(aged.is_finalized);
    }
}
