//! S2 (§8): the same window as S1 plus the remaining four source types,
//! all reaching TIER3 together. Expects TCS=1.0 (EXCELLENT), the summed
//! liquidity and the raw sentiment score carried through untouched.

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use risk_types::{RiskEvent, SourceType, TcsStatus};

    use crate::support::{base_time, unused_rpcs, window_manager_for};

    #[tokio::test]
    async fn scenario_s2_full_five_source_window() {
        let now = base_time();
        let mgr = window_manager_for(&["ethereum"], "USDC");
        let event_ts = now + Duration::seconds(10);

        let mut price = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, event_ts);
        price.price = Some(1.0003);
        let mut liquidity = RiskEvent::new("USDC", "ethereum", "liquidityA", SourceType::Liquidity, event_ts);
        liquidity.liquidity_depth = Some(2e8);
        let mut supply = RiskEvent::new("USDC", "ethereum", "supplyA", SourceType::Supply, event_ts);
        supply.net_supply_change = Some(-5e5);
        let mut volatility = RiskEvent::new("USDC", "ethereum", "volA", SourceType::Volatility, event_ts);
        volatility.market_volatility = Some(4e-4);
        let mut sentiment = RiskEvent::new("USDC", "ethereum", "sentA", SourceType::Sentiment, event_ts);
        sentiment.sentiment_score = Some(0.3);

        for event in [price, liquidity, supply, volatility, sentiment] {
            mgr.assign_event(event, now).unwrap();
        }

        let rpcs = unused_rpcs(&["ethereum"]);
        let later = now + Duration::minutes(75);
        let snapshots = mgr.scheduler_tick(&rpcs, later).await;

        assert_eq!(snapshots.len(), 1);
        let snapshot = &snapshots[0];
        assert!((snapshot.temporal_confidence - 1.0).abs() < 1e-9);
        assert_eq!(TcsStatus::from_score(snapshot.temporal_confidence), TcsStatus::Excellent);
        assert!((snapshot.total_liquidity - 2e8).abs() / 2e8 < 1e-9);
        assert!((snapshot.sentiment_score - 0.3).abs() < 1e-9);
    }
}
