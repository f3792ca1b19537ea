//! # risk-finality
//!
//! Per-chain finality tracking (§4.1): assigns a coarse [`risk_types::FinalityTier`]
//! and a numeric confidence to each event, from confirmation counts for
//! on-chain events and from age for off-chain ones.
//!
//! Refreshing finality is idempotent and safe to call repeatedly — the tier
//! never decreases except through a reorg-driven invalidation, which is the
//! block monitor/reorg handler's job, not this crate's.

#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod domain;
pub mod error;
pub mod metrics;

pub use domain::FinalityTracker;
pub use error::{FinalityError, FinalityResult};
