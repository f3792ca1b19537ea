//! S3 (§8): a single off-peg price event finalizes into a snapshot with
//! `depeg_severity=0.03` and `is_depegged=true` at the default 0.02
//! threshold.

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use risk_types::{RiskEvent, SourceType};

    use crate::support::{base_time, unused_rpcs, window_manager_for};

    #[tokio::test]
    async fn scenario_s3_depeg_detection() {
        let now = base_time();
        let mgr = window_manager_for(&["ethereum"], "USDC");

        let mut event = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now + Duration::seconds(10));
        event.price = Some(0.97);
        mgr.assign_event(event, now).unwrap();

        let rpcs = unused_rpcs(&["ethereum"]);
        let later = now + Duration::minutes(75);
        let snapshots = mgr.scheduler_tick(&rpcs, later).await;

        assert_eq!(snapshots.len(), 1);
        let snapshot = &snapshots[0];
        assert!((snapshot.depeg_severity - 0.03).abs() < 1e-9);
        assert!(snapshot.is_depegged);
    }
}
