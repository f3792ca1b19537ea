//! # risk-cross-chain
//!
//! Folds per-chain event batches for one `(coin, window_id)` into a single
//! [`risk_types::AggregatedRiskSnapshot`] (§4.6). Pure and stateless: the
//! window manager owns the events, this crate only computes the product.

#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod domain;

pub use domain::{
    detect_divergence, grace_period_secs, group_by_chain, is_ready, ChainEventBatch, CrossChainAggregationResult,
    CrossChainAggregator, DivergencePair,
};
