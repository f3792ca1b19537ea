//! S5 (§8): event E1 (block 100) is caught in a reorg; a matching
//! replacement E2 (block 101) for the same `(coin, source)` within the
//! match window produces a version-bumped correction under E1's
//! `event_id`, while E1 itself is invalidated and cross-referenced.

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use risk_reorg::ReorgHandler;
    use risk_types::{RiskEvent, SourceType};

    #[test]
    fn scenario_s5_reorg_with_matching_replacement() {
        let handler = ReorgHandler::new();
        let now = Utc::now();

        let mut e1 = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now);
        e1.price = Some(1.0);
        e1.block_number = Some(100);
        let original_id = e1.event_id;

        let mut e2 = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now);
        e2.price = Some(0.999);
        e2.block_number = Some(101);

        let mut affected = vec![e1];
        let corrections = handler.handle_reorg("ethereum", &mut affected, Some(&[e2]), 99, 100, now);

        assert_eq!(corrections.len(), 1);
        let correction = &corrections[0];
        assert_eq!(correction.event_id, original_id);
        assert_eq!(correction.event_version, 2);
        assert_eq!(correction.block_number, Some(101));
        assert_eq!(correction.original_block_number, Some(100));
        assert_eq!(correction.price, Some(0.999));

        let e1 = &affected[0];
        assert!(e1.invalidated);
        assert_eq!(e1.replacement_event_id, Some(original_id));

        let stats = handler.stats("ethereum");
        assert_eq!(stats.reorg_count, 1);
        assert_eq!(stats.max_depth, 1);
    }
}
