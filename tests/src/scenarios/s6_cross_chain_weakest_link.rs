//! S6 (§8): one coin across three chains. Ethereum and Arbitrum events are
//! all TIER3; Solana has one TIER1 event. The chain-confidence override is
//! the weakest link (0.3), and the aggregator's double-discount (§9) keeps
//! the adjusted TCS at or below it regardless of the other two chains.

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use risk_cross_chain::CrossChainAggregator;
    use risk_types::{CoinConfig, FinalityTier, RiskEvent, SourceType, TcsConfig, WindowState};

    fn tier3_event(chain: &str, now: chrono::DateTime<Utc>) -> RiskEvent {
        let mut e = RiskEvent::new("USDC", chain, "priceA", SourceType::Price, now);
        e.price = Some(1.0);
        e.finality_tier = FinalityTier::Tier3;
        e.is_finalized = true;
        e
    }

    #[test]
    fn scenario_s6_cross_chain_weakest_link() {
        let now = Utc::now();
        let coin = CoinConfig::stablecoin("USDC", &["ethereum", "arbitrum", "solana"]);

        let mut solana_weak = tier3_event("solana", now);
        solana_weak.finality_tier = FinalityTier::Tier1;
        solana_weak.is_finalized = false;

        let events = vec![tier3_event("ethereum", now), tier3_event("arbitrum", now), solana_weak];

        let result = CrossChainAggregator::aggregate(&coin, "w1", WindowState::Provisional, &events, &TcsConfig::default(), now);

        assert_eq!(result.snapshot.confidence_breakdown.chain_confidence, 0.3);
        assert!(result.snapshot.temporal_confidence <= 0.3 + 1e-9);
    }
}
