//! Default concrete adapters for the two out-of-scope ports
//! (`ChainRpc`, `RiskSource`, §6): in-memory simulators, not production
//! transports. A real deployment swaps these for genuine RPC clients and
//! data-source integrations without touching the core crates.

pub mod rpc;
pub mod sources;

pub use rpc::SimulatedChainRpc;
pub use sources::{OffChainMetricSource, OnChainPriceSource};
