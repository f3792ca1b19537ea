//! Feature-gated Prometheus metrics with a no-op fallback (same dual-path
//! pattern as `risk-finality::metrics`).

#[cfg(feature = "metrics")]
mod enabled {
    use lazy_static::lazy_static;
    use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

    lazy_static! {
        pub static ref EVENTS_DEDUPLICATED: IntCounter =
            register_int_counter!("risk_quality_events_deduplicated_total", "Events dropped as duplicates").unwrap();
        pub static ref EVENTS_OUTLIER_FLAGGED: IntCounter = register_int_counter!(
            "risk_quality_events_outlier_flagged_total",
            "Events flagged as statistical outliers"
        )
        .unwrap();
        pub static ref CIRCUIT_STATE: IntCounterVec = register_int_counter_vec!(
            "risk_quality_circuit_transitions_total",
            "Circuit breaker state transitions by source and resulting state",
            &["source", "state"]
        )
        .unwrap();
    }

    pub fn record_deduplicated() {
        EVENTS_DEDUPLICATED.inc();
    }

    pub fn record_outlier_flagged() {
        EVENTS_OUTLIER_FLAGGED.inc();
    }

    pub fn record_circuit_transition(source: &str, state: &str) {
        CIRCUIT_STATE.with_label_values(&[source, state]).inc();
    }
}

#[cfg(not(feature = "metrics"))]
mod disabled {
    pub fn record_deduplicated() {}
    pub fn record_outlier_flagged() {}
    pub fn record_circuit_transition(_source: &str, _state: &str) {}
}

#[cfg(feature = "metrics")]
pub use enabled::*;
#[cfg(not(feature = "metrics"))]
pub use disabled::*;

#[cfg(test)]
mod tests {
    #[test]
    fn no_op_path_compiles_and_runs() {
        super::record_deduplicated();
        super::record_outlier_flagged();
        super::record_circuit_transition("priceA", "OPEN");
    }
}
