//! Prometheus metrics, feature-gated behind `metrics` with a no-op fallback
//! so the rest of the crate never has to `cfg` around missing counters.

#[cfg(feature = "metrics")]
mod enabled {
    use lazy_static::lazy_static;
    use prometheus::{register_int_counter_vec, IntCounterVec};

    lazy_static! {
        pub static ref FINALITY_REFRESHES: IntCounterVec = register_int_counter_vec!(
            "risk_finality_refreshes_total",
            "Finality refresh calls by chain and resulting tier",
            &["chain", "tier"]
        )
        .unwrap();
        pub static ref REORGS_OBSERVED: IntCounterVec = register_int_counter_vec!(
            "risk_finality_reorgs_observed_total",
            "Events invalidated by a missing on-chain block, by chain",
            &["chain"]
        )
        .unwrap();
    }

    pub fn record_refresh(chain: &str, tier: &str) {
        FINALITY_REFRESHES.with_label_values(&[chain, tier]).inc();
    }

    pub fn record_reorg_observed(chain: &str) {
        REORGS_OBSERVED.with_label_values(&[chain]).inc();
    }
}

#[cfg(not(feature = "metrics"))]
mod disabled {
    pub fn record_refresh(_chain: &str, _tier: &str) {}
    pub fn record_reorg_observed(_chain: &str) {}
}

#[cfg(feature = "metrics")]
pub use enabled::*;
#[cfg(not(feature = "metrics"))]
pub use disabled::*;
