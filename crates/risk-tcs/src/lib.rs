//! # risk-tcs
//!
//! The Temporal Confidence Score calculator (§4.3). Pure function of an
//! event set and a reference time; holds no state of its own.
//!
//! `TCS = clamp((f * c * k) / s, 0, 1)`, where `f` is importance-weighted
//! finality, `c` is the minimum confidence across chains, `k` is source
//! completeness, and `s` is a staleness penalty derived from the oldest
//! event present. Dividing by `s` rather than subtracting gives a smoother
//! degradation curve than a linear penalty would.

#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod calculator;

pub use calculator::TcsCalculator;
