//! # risk-engine-tests
//!
//! End-to-end scenario suite (§8) exercising real subsystem crates wired
//! together the way [`risk_orchestrator::container::Engine`] wires them,
//! rather than any one crate's isolated unit tests. Each scenario module
//! corresponds to one of S1-S6; [`support`] holds the deterministic fixture
//! adapters shared across them.

#![allow(dead_code)]

pub mod engine_smoke;
pub mod scenarios;
pub mod support;
