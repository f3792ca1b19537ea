//! S1 (§8): a single price event in a 60s window, scheduler advanced to
//! t=01:15:00 with finality already TIER3 by age. Expects one snapshot with
//! `avg_price=1.0003`, completeness 1/5, TCS=0.2 (POOR).

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use risk_types::{RiskEvent, SourceType, TcsStatus};

    use crate::support::{base_time, unused_rpcs, window_manager_for};

    #[tokio::test]
    async fn scenario_s1_single_source_price_in_one_window() {
        let now = base_time();
        let mgr = window_manager_for(&["ethereum"], "USDC");

        let mut event = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now + Duration::seconds(10));
        event.price = Some(1.0003);
        mgr.assign_event(event, now).unwrap();

        let rpcs = unused_rpcs(&["ethereum"]);
        let later = now + Duration::minutes(75); // t = 01:15:00
        let snapshots = mgr.scheduler_tick(&rpcs, later).await;

        assert_eq!(snapshots.len(), 1);
        let snapshot = &snapshots[0];
        assert!((snapshot.avg_price - 1.0003).abs() < 1e-9);
        assert!((snapshot.confidence_breakdown.completeness - 0.2).abs() < 1e-9);
        assert!((snapshot.temporal_confidence - 0.2).abs() < 1e-9);
        assert_eq!(TcsStatus::from_score(snapshot.temporal_confidence), TcsStatus::Poor);
        assert!(!snapshot.is_depegged);
    }
}
