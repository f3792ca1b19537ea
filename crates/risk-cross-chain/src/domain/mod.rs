pub mod aggregator;
pub mod batch;
pub mod divergence;

pub use aggregator::{grace_period_secs, is_ready, CrossChainAggregationResult, CrossChainAggregator};
pub use batch::{group_by_chain, ChainEventBatch};
pub use divergence::{detect_divergence, DivergencePair};
