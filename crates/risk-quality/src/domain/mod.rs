pub mod circuit_breaker;
pub mod dedup;
pub mod normalize;
pub mod outlier;

pub use circuit_breaker::{backoff_delay, CircuitBreaker, CircuitEvent, CircuitState};
pub use dedup::{deduplicate, DedupCache};
pub use normalize::normalize;
pub use outlier::flag_outliers;
