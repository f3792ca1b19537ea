//! Stage 1: normalize (§4.2).

use risk_types::{QualityConfig, RiskEvent};

/// Uppercase `coin`, lowercase `chain`, clamp `price` into the configured
/// stablecoin bounds, reset `quality_score` to 1.0. Timestamps already carry
/// UTC (`DateTime<Utc>`) so there is no timezone string to strip.
pub fn normalize(events: &mut [RiskEvent], config: &QualityConfig) {
    for event in events.iter_mut() {
        event.coin = event.coin.to_uppercase();
        event.chain = event.chain.to_lowercase();
        event.quality_score = 1.0;

        if let Some(price) = event.price {
            let clamped = price.clamp(config.price_min, config.price_max);
            if clamped != price {
                tracing::warn!(
                    event_id = %event.event_id,
                    original = price,
                    clamped,
                    "price clamped to stablecoin bounds"
                );
            }
            event.price = Some(clamped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use risk_types::SourceType;

    fn price_event(coin: &str, chain: &str, price: f64) -> RiskEvent {
        let mut e = RiskEvent::new(coin, chain, "priceA", SourceType::Price, Utc::now());
        e.price = Some(price);
        e
    }

    #[test]
    fn clamps_before_anything_else_sees_it() {
        let config = QualityConfig::default();
        let mut events = vec![price_event("usdc", "Ethereum", 1.2)];
        normalize(&mut events, &config);
        assert_eq!(events[0].coin, "USDC");
        assert_eq!(events[0].chain, "ethereum");
        assert_eq!(events[0].price, Some(1.05));
    }

    #[test]
    fn within_bounds_price_untouched() {
        let config = QualityConfig::default();
        let mut events = vec![price_event("USDC", "ethereum", 1.0003)];
        normalize(&mut events, &config);
        assert_eq!(events[0].price, Some(1.0003));
    }
}
