//! Feature-gated Prometheus metrics with a no-op fallback (same dual-path
//! pattern as `risk-quality::metrics`).

#[cfg(feature = "metrics")]
mod enabled {
    use lazy_static::lazy_static;
    use prometheus::{register_int_counter_vec, IntCounterVec};

    lazy_static! {
        pub static ref REORGS_DETECTED: IntCounterVec =
            register_int_counter_vec!("risk_block_monitor_reorgs_total", "Reorgs detected per chain", &["chain"]).unwrap();
    }

    pub fn record_reorg(chain: &str) {
        REORGS_DETECTED.with_label_values(&[chain]).inc();
    }
}

#[cfg(not(feature = "metrics"))]
mod disabled {
    pub fn record_reorg(_chain: &str) {}
}

#[cfg(feature = "metrics")]
pub use enabled::*;
#[cfg(not(feature = "metrics"))]
pub use disabled::*;

#[cfg(test)]
mod tests {
    #[test]
    fn no_op_path_compiles_and_runs() {
        super::record_reorg("ethereum");
    }
}
