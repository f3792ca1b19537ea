//! Orchestrator-level Prometheus metrics and the text-exposition encoder.
//!
//! Every subsystem crate registers its own counters into the process-wide
//! default registry via `register_int_counter_vec!` (see e.g.
//! `risk-finality::metrics`); this module only adds the handful of metrics
//! that belong to the orchestrator itself and exposes the combined text
//! encoding for a scrape endpoint.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Total raw events ingested from all sources, pre-quality-screening.
    pub static ref EVENTS_INGESTED: IntCounter = register_int_counter!(
        "risk_engine_events_ingested_total",
        "Total raw events accepted from data sources before quality screening"
    )
    .expect("metric registration failed");

    /// Total finalized snapshots emitted.
    pub static ref SNAPSHOTS_EMITTED: IntCounter = register_int_counter!(
        "risk_engine_snapshots_emitted_total",
        "Total AggregatedRiskSnapshots emitted on window FINAL"
    )
    .expect("metric registration failed");

    /// Live (non-evicted) windows currently tracked by the window manager.
    pub static ref LIVE_WINDOWS: IntGauge = register_int_gauge!(
        "risk_engine_live_windows",
        "Number of windows currently tracked by the window manager"
    )
    .expect("metric registration failed");
}

/// Force registration of the orchestrator-level metrics above (their
/// `lazy_static` initializers only run on first access otherwise).
pub fn register_metrics() {
    lazy_static::initialize(&EVENTS_INGESTED);
    lazy_static::initialize(&SNAPSHOTS_EMITTED);
    lazy_static::initialize(&LIVE_WINDOWS);
}

/// Render every metric in the process-wide default registry (this crate's
/// and every subsystem crate's) as Prometheus text exposition format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_metrics_includes_registered_counters() {
        register_metrics();
        EVENTS_INGESTED.inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("risk_engine_events_ingested_total"));
    }
}
