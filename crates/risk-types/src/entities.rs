//! Core domain entities: the event atom, the aggregated product, and the
//! internal time window that owns both.
//!
//! === CLUSTER A: identity & provenance enums ===

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Coarse confidence bucket assigned by the finality tracker.
///
/// The numeric mapping is fixed by design (§4.1): TIER1 is a bare
/// observation, TIER2 is "probably safe", TIER3 is economically final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FinalityTier {
    Tier1,
    Tier2,
    Tier3,
}

impl FinalityTier {
    /// Fixed tier -> confidence mapping. Never configurable: changing it
    /// would silently rescale every TCS ever computed.
    pub fn confidence(self) -> f64 {
        match self {
            FinalityTier::Tier1 => 0.3,
            FinalityTier::Tier2 => 0.8,
            FinalityTier::Tier3 => 1.0,
        }
    }
}

/// Lifecycle state of a [`crate::TimeWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowState {
    Open,
    Provisional,
    Final,
}

/// Explicit producer-kind tag carried by every event.
///
/// Supersedes inferring the source kind from which payload field happens to
/// be populated (see `RiskEvent::infer_source_type`, kept only as a
/// debug-assertion fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceType {
    Price,
    Liquidity,
    Supply,
    Volatility,
    Sentiment,
}

impl SourceType {
    pub fn all() -> [SourceType; 5] {
        [
            SourceType::Price,
            SourceType::Liquidity,
            SourceType::Supply,
            SourceType::Volatility,
            SourceType::Sentiment,
        ]
    }
}

/// How far an event or snapshot has travelled through the aggregation
/// pipeline. Restored from the original schema; not in the distilled spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationLevel {
    /// A single source's direct observation.
    Raw,
    /// Folded from multiple sources within one chain/window.
    CrossSource,
    /// Folded across chains by the cross-chain aggregator.
    CrossChain,
}

/// The four components that combine into a Temporal Confidence Score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub finality_weight: f64,
    pub chain_confidence: f64,
    pub completeness: f64,
    pub staleness_penalty: f64,
    pub temporal_confidence: f64,
}

impl ConfidenceBreakdown {
    pub fn zero() -> Self {
        ConfidenceBreakdown {
            finality_weight: 0.0,
            chain_confidence: 0.0,
            completeness: 0.0,
            staleness_penalty: 1.0,
            temporal_confidence: 0.0,
        }
    }
}

/// A human-readable confidence bucket derived from the scalar TCS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TcsStatus {
    Excellent,
    Good,
    Moderate,
    Low,
    Poor,
}

impl TcsStatus {
    pub fn from_score(tcs: f64) -> Self {
        if tcs >= 0.9 {
            TcsStatus::Excellent
        } else if tcs >= 0.8 {
            TcsStatus::Good
        } else if tcs >= 0.6 {
            TcsStatus::Moderate
        } else if tcs >= 0.4 {
            TcsStatus::Low
        } else {
            TcsStatus::Poor
        }
    }
}

/// The atom of the system: one observation, possibly later invalidated or
/// superseded by a reorg correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEvent {
    // --- identity ---
    pub event_id: Uuid,
    pub event_version: u64,

    // --- provenance ---
    pub coin: String,
    pub chain: String,
    pub source: String,
    pub source_type: SourceType,
    pub timestamp: DateTime<Utc>,

    // --- payload (sparse; populated per source_type) ---
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub liquidity_depth: Option<f64>,
    pub net_supply_change: Option<f64>,
    pub market_volatility: Option<f64>,
    pub sentiment_score: Option<f64>,

    // --- on-chain anchor ---
    pub block_number: Option<u64>,
    pub tx_hash: Option<String>,
    pub confirmation_count: Option<u64>,
    pub original_block_number: Option<u64>,

    // --- finality state ---
    pub finality_tier: FinalityTier,
    pub is_finalized: bool,
    pub finality_timestamp: Option<DateTime<Utc>>,

    // --- confidence ---
    pub temporal_confidence: f64,
    pub confidence_breakdown: ConfidenceBreakdown,

    // --- window binding ---
    pub window_id: Option<String>,
    pub window_state: Option<WindowState>,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,

    // --- reorg state ---
    pub invalidated: bool,
    pub replacement_event_id: Option<Uuid>,
    pub reorg_detected_at: Option<DateTime<Utc>>,

    // --- quality ---
    pub is_outlier: bool,
    pub quality_score: f64,

    // --- metadata ---
    pub source_importance: f64,
    pub tags: HashMap<String, String>,

    // --- supplemented provenance (originally dropped from the distillation) ---
    pub aggregation_level: AggregationLevel,
    pub deduplication_count: u32,
    pub aggregated_from: Vec<Uuid>,
    pub processing_latency_ms: Option<f64>,
}

impl RiskEvent {
    /// Construct a fresh, un-processed raw event. Finality/quality/window
    /// fields start at their pipeline-entry defaults; later stages fill
    /// them in place.
    pub fn new(
        coin: impl Into<String>,
        chain: impl Into<String>,
        source: impl Into<String>,
        source_type: SourceType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        RiskEvent {
            event_id: Uuid::new_v4(),
            event_version: 1,
            coin: coin.into(),
            chain: chain.into(),
            source: source.into(),
            source_type,
            timestamp,
            price: None,
            volume: None,
            liquidity_depth: None,
            net_supply_change: None,
            market_volatility: None,
            sentiment_score: None,
            block_number: None,
            tx_hash: None,
            confirmation_count: None,
            original_block_number: None,
            finality_tier: FinalityTier::Tier1,
            is_finalized: false,
            finality_timestamp: None,
            temporal_confidence: 0.0,
            confidence_breakdown: ConfidenceBreakdown::zero(),
            window_id: None,
            window_state: None,
            window_start: None,
            window_end: None,
            invalidated: false,
            replacement_event_id: None,
            reorg_detected_at: None,
            is_outlier: false,
            quality_score: 1.0,
            source_importance: 1.0,
            tags: HashMap::new(),
            aggregation_level: AggregationLevel::Raw,
            deduplication_count: 0,
            aggregated_from: Vec::new(),
            processing_latency_ms: None,
        }
    }

    /// Diagnostic fallback only (§9 REDESIGN): infer a source type from
    /// which payload field is populated. Used in debug assertions to flag
    /// producers whose explicit `source_type` disagrees with their payload,
    /// never as the primary dispatch path.
    pub fn infer_source_type(&self) -> Option<SourceType> {
        if self.price.is_some() {
            Some(SourceType::Price)
        } else if self.liquidity_depth.is_some() {
            Some(SourceType::Liquidity)
        } else if self.net_supply_change.is_some() {
            Some(SourceType::Supply)
        } else if self.market_volatility.is_some() {
            Some(SourceType::Volatility)
        } else if self.sentiment_score.is_some() {
            Some(SourceType::Sentiment)
        } else {
            None
        }
    }

    pub fn is_on_chain(&self) -> bool {
        self.block_number.is_some()
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.timestamp
    }

    pub fn should_attest(&self, threshold: f64) -> bool {
        self.temporal_confidence >= threshold
    }
}

/// The output of a FINAL window or the cross-chain aggregator: one asset's
/// risk picture for one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRiskSnapshot {
    pub snapshot_id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub coin: String,
    pub chains: Vec<String>,
    pub window_id: String,
    pub window_state: WindowState,
    pub aggregation_level: AggregationLevel,

    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub total_liquidity: f64,
    pub total_volume: f64,
    pub net_supply_change: f64,
    pub market_volatility: f64,
    pub sentiment_score: f64,

    pub temporal_confidence: f64,
    pub confidence_breakdown: ConfidenceBreakdown,

    pub num_events_aggregated: usize,
    pub sources_included: Vec<String>,
    pub event_ids: Vec<Uuid>,

    pub is_depegged: bool,
    pub depeg_severity: f64,
}

/// Internal time bucket; owns its events and drives the OPEN -> PROVISIONAL
/// -> FINAL state machine (the machine itself lives in `risk-window`, this
/// type is the data it operates on).
#[derive(Debug, Clone)]
pub struct TimeWindow {
    pub window_id: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub state: WindowState,
    pub events: Vec<RiskEvent>,
    pub opened_at: DateTime<Utc>,
    pub provisional_at: Option<DateTime<Utc>>,
    pub final_at: Option<DateTime<Utc>>,
    pub snapshot: Option<AggregatedRiskSnapshot>,
}

impl TimeWindow {
    pub fn new(window_id: String, window_start: DateTime<Utc>, window_end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        TimeWindow {
            window_id,
            window_start,
            window_end,
            state: WindowState::Open,
            events: Vec::new(),
            opened_at: now,
            provisional_at: None,
            final_at: None,
            snapshot: None,
        }
    }

    pub fn chains(&self) -> Vec<String> {
        let mut chains: Vec<String> = self.events.iter().map(|e| e.chain.clone()).collect();
        chains.sort();
        chains.dedup();
        chains
    }

    pub fn all_events_resolved(&self) -> bool {
        self.events.iter().all(|e| e.is_finalized || e.invalidated)
    }
}
