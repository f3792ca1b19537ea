//! # risk-orchestrator
//!
//! Process entry point (§6): assembles the layered configuration, wires
//! every subsystem crate behind one [`container::Engine`], and drives the
//! scheduler loop. The concrete [`fixtures`] adapters stand in for the
//! out-of-scope RPC transport and data-source integrations so the engine
//! is runnable end to end; swapping them for production adapters touches
//! only this crate.

#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod config;
pub mod container;
pub mod error;
pub mod fixtures;

pub use config::{load_engine_config, load_telemetry_config, resolve_selection, CliArgs, Selection};
pub use container::Engine;
pub use error::{ConfigurationError, OrchestratorError, OrchestratorResult};
