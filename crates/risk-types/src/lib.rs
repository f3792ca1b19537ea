//! # risk-types
//!
//! Shared domain entities, configuration surface, and cross-cutting port
//! traits for the stablecoin risk-aggregation engine.
//!
//! ## Layout
//!
//! - [`entities`] — `RiskEvent`, `AggregatedRiskSnapshot`, `TimeWindow`, and
//!   the small enums that tag them (`FinalityTier`, `WindowState`,
//!   `SourceType`, `AggregationLevel`).
//! - [`config`] — the configuration surface consumed by every subsystem
//!   (`ChainProfile`, `CoinConfig`, `TcsConfig`, `WindowConfig`,
//!   `QualityConfig`, and the top-level `EngineConfig`).
//! - [`ports`] — port traits shared by more than one subsystem
//!   (`ChainRpc`, `RiskSource`).
//!
//! No subsystem in this workspace owns a process-wide singleton; an
//! `EngineConfig` is built once at startup and handed down as an `Arc`.

#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod config;
pub mod entities;
pub mod ports;

pub use config::{ChainProfile, CoinConfig, EngineConfig, QualityConfig, TcsConfig, WindowConfig};
pub use entities::{
    AggregatedRiskSnapshot, AggregationLevel, ConfidenceBreakdown, FinalityTier, RiskEvent,
    SourceType, TcsStatus, TimeWindow, WindowState,
};
pub use ports::{BlockHeader, ChainRpc, ChainRpcError, RiskSource, SourceError};
