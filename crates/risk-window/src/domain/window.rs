//! Event intake and snapshot production for a single [`TimeWindow`] (§4.7).

use chrono::{DateTime, Utc};
use risk_cross_chain::CrossChainAggregator;
use risk_types::{CoinConfig, RiskEvent, TcsConfig, TimeWindow, WindowState};

use crate::error::{WindowError, WindowResult};

/// Add `event` to `window`, stamping its window-binding fields. Only legal
/// while the window is still OPEN — late arrivals against a PROVISIONAL or
/// FINAL window are a caller bug, not a recoverable event-level failure.
/// Above `max_events`, the window is at its §5 backpressure cap and the
/// event is dropped rather than letting the window grow unbounded.
pub fn add_event(window: &mut TimeWindow, mut event: RiskEvent, max_events: usize) -> WindowResult<()> {
    if window.state != WindowState::Open {
        return Err(WindowError::NotOpen {
            window_id: window.window_id.clone(),
        });
    }
    if window.events.len() >= max_events {
        return Err(WindowError::AtCapacity {
            window_id: window.window_id.clone(),
            max: max_events,
        });
    }
    event.window_id = Some(window.window_id.clone());
    event.window_state = Some(window.state);
    event.window_start = Some(window.window_start);
    event.window_end = Some(window.window_end);
    window.events.push(event);
    Ok(())
}

/// Produce the window's snapshot via the cross-chain aggregator (§4.6's
/// single-chain degenerate case falls out of the same call with one batch).
pub fn generate_snapshot(window: &mut TimeWindow, coin: &CoinConfig, tcs_config: &TcsConfig, now: DateTime<Utc>) {
    let live_events: Vec<RiskEvent> = window.events.iter().filter(|e| !e.invalidated).cloned().collect();
    let result = CrossChainAggregator::aggregate(coin, &window.window_id, window.state, &live_events, tcs_config, now);
    window.snapshot = Some(result.snapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_types::SourceType;

    fn open_window(now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::new(
            "w1".into(),
            now,
            now + chrono::Duration::seconds(60),
            now,
        )
    }

    #[test]
    fn add_event_stamps_window_binding() {
        let now = Utc::now();
        let mut window = open_window(now);
        let event = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now);
        add_event(&mut window, event, 10_000).unwrap();
        assert_eq!(window.events[0].window_id.as_deref(), Some("w1"));
        assert_eq!(window.events[0].window_state, Some(WindowState::Open));
    }

    #[test]
    fn add_event_rejects_non_open_window() {
        let now = Utc::now();
        let mut window = open_window(now);
        window.state = WindowState::Provisional;
        let event = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now);
        assert!(add_event(&mut window, event, 10_000).is_err());
    }

    #[test]
    fn add_event_rejects_once_at_capacity() {
        let now = Utc::now();
        let mut window = open_window(now);
        let first = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now);
        add_event(&mut window, first, 1).unwrap();
        let second = RiskEvent::new("USDC", "ethereum", "priceB", SourceType::Price, now);
        let err = add_event(&mut window, second, 1).unwrap_err();
        assert!(matches!(err, WindowError::AtCapacity { .. }));
        assert_eq!(window.events.len(), 1);
    }

    #[test]
    fn generate_snapshot_excludes_invalidated_events() {
        let now = Utc::now();
        let mut window = open_window(now);
        let mut kept = RiskEvent::new("USDC", "ethereum", "priceA", SourceType::Price, now);
        kept.price = Some(1.0);
        let mut invalidated = RiskEvent::new("USDC", "ethereum", "priceB", SourceType::Price, now);
        invalidated.price = Some(5.0);
        invalidated.invalidated = true;
        window.events.push(kept);
        window.events.push(invalidated);

        let coin = CoinConfig::stablecoin("USDC", &["ethereum"]);
        generate_snapshot(&mut window, &coin, &TcsConfig::default(), now);
        let snapshot = window.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.num_events_aggregated, 1);
        assert_eq!(snapshot.avg_price, 1.0);
    }
}
