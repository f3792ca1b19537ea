//! Event types that flow through the in-process bus (grounded in the
//! teacher's `shared-bus::events`, narrowed to this engine's lifecycle).

use chrono::{DateTime, Utc};
use risk_types::{AggregatedRiskSnapshot, RiskEvent};
use serde::{Deserialize, Serialize};

/// Everything a consumer can subscribe to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RiskEngineEvent {
    /// A raw event passed quality screening and was assigned to a window.
    EventIngested(RiskEvent),
    /// A window reached FINAL and produced a snapshot.
    SnapshotFinalized(AggregatedRiskSnapshot),
    /// A reorg was detected and handled on a chain.
    ReorgDetected {
        chain: String,
        fork_point: u64,
        detected_height: u64,
        affected_count: usize,
        at: DateTime<Utc>,
    },
    /// A source's circuit breaker tripped open.
    CircuitOpened { source: String, at: DateTime<Utc> },
    /// Something requiring operator attention.
    CriticalError { component: String, message: String },
}

impl RiskEngineEvent {
    pub fn topic(&self) -> EventTopic {
        match self {
            RiskEngineEvent::EventIngested(_) => EventTopic::Ingestion,
            RiskEngineEvent::SnapshotFinalized(_) => EventTopic::Snapshots,
            RiskEngineEvent::ReorgDetected { .. } => EventTopic::Reorgs,
            RiskEngineEvent::CircuitOpened { .. } => EventTopic::Quality,
            RiskEngineEvent::CriticalError { .. } => EventTopic::DeadLetterQueue,
        }
    }
}

/// Topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Ingestion,
    Snapshots,
    Reorgs,
    Quality,
    DeadLetterQueue,
    All,
}

/// Filter for subscribing to a subset of topics.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    pub fn all() -> Self {
        EventFilter { topics: Vec::new() }
    }

    pub fn topics(topics: Vec<EventTopic>) -> Self {
        EventFilter { topics }
    }

    pub fn matches(&self, event: &RiskEngineEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&EventTopic::All) || self.topics.contains(&event.topic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_types::WindowState;
    use uuid::Uuid;

    fn snapshot_event() -> RiskEngineEvent {
        RiskEngineEvent::SnapshotFinalized(AggregatedRiskSnapshot {
            snapshot_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            coin: "USDC".into(),
            chains: vec!["ethereum".into()],
            window_id: "w1".into(),
            window_state: WindowState::Final,
            aggregation_level: risk_types::AggregationLevel::CrossSource,
            avg_price: 1.0,
            min_price: 1.0,
            max_price: 1.0,
            total_liquidity: 0.0,
            total_volume: 0.0,
            net_supply_change: 0.0,
            market_volatility: 0.0,
            sentiment_score: 0.0,
            temporal_confidence: 1.0,
            confidence_breakdown: risk_types::ConfidenceBreakdown::zero(),
            num_events_aggregated: 1,
            sources_included: vec![],
            event_ids: vec![],
            is_depegged: false,
            depeg_severity: 0.0,
        })
    }

    #[test]
    fn filter_all_matches_everything() {
        assert!(EventFilter::all().matches(&snapshot_event()));
    }

    #[test]
    fn filter_by_topic_excludes_others() {
        let filter = EventFilter::topics(vec![EventTopic::Reorgs]);
        assert!(!filter.matches(&snapshot_event()));
    }
}
