//! # risk-quality
//!
//! Data-quality pipeline (§4.2): normalize, deduplicate, and statistically
//! screen a batch of [`risk_types::RiskEvent`]s, plus a companion
//! circuit-breaker/backoff facility shielding source collaborators from a
//! repeatedly-failing transport.
//!
//! The pipeline never raises for a single bad event — it normalizes
//! aggressively, drops duplicates silently, and lets the outlier flag carry
//! the signal downstream (§7).

#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod domain;
pub mod error;
pub mod metrics;
pub mod service;

pub use domain::{backoff_delay, CircuitBreaker, CircuitEvent, CircuitState, DedupCache};
pub use error::{QualityError, QualityResult};
pub use service::QualityPipeline;
