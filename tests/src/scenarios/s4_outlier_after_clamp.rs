//! S4 (§8): clamping runs before outlier screening. A raw 1.2 price clamps
//! to 1.05 during normalize; the outlier pass then runs on the clamped
//! distribution, which is tight enough that nothing gets flagged.

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use risk_types::{QualityConfig, RiskEvent, SourceType};
    use risk_quality::QualityPipeline;

    fn price_event(price: f64) -> RiskEvent {
        let mut e = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, Utc::now());
        e.price = Some(price);
        e
    }

    #[test]
    fn scenario_s4_outlier_flagging_runs_on_clamped_data() {
        let pipeline = QualityPipeline::new(QualityConfig::default());
        let now = Utc::now();

        let events = vec![price_event(1.0001), price_event(1.0002), price_event(1.2)];
        let out = pipeline.process_events(events, now);

        assert_eq!(out.len(), 3);
        let clamped = out.iter().find(|e| (e.price.unwrap() - 1.05).abs() < 1e-9);
        assert!(clamped.is_some(), "1.2 should have clamped to 1.05");
        assert!(out.iter().all(|e| !e.is_outlier));
    }
}
