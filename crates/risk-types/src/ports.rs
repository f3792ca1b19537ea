//! Port traits shared across more than one subsystem crate (§6). Each
//! subsystem that needs an additional, narrower port defines it locally;
//! these are the handful of contracts enough components share that they
//! belong to the common vocabulary instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::RiskEvent;

/// A fetched block header, chain-agnostic (§6 chain-RPC contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: DateTime<Utc>,
}

/// Driven port: the capability contract the core needs from a chain RPC
/// transport. Wire format (EVM JSON-RPC, Solana's slot/block dialect, ...)
/// is an adapter concern the core never sees.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn current_height(&self) -> Result<u64, ChainRpcError>;
    async fn block_at(&self, height: u64) -> Result<Option<BlockHeader>, ChainRpcError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChainRpcError {
    #[error("transport error contacting {chain}: {message}")]
    Transport { chain: String, message: String },
    #[error("request to {chain} timed out after {elapsed_ms}ms")]
    Timeout { chain: String, elapsed_ms: u64 },
}

/// Driving port: the capability contract a data source must satisfy
/// (§6 data-source contract). Concrete adapters (price feeds, DEX
/// subgraphs, sentiment APIs) are out of scope; this is what they'd
/// implement.
#[async_trait]
pub trait RiskSource: Send + Sync {
    /// Human-readable name, used as the failure-counter key for the
    /// circuit breaker (§4.2 companion facility).
    fn name(&self) -> &str;

    async fn fetch(&self, coin: &str, chain: &str) -> Result<Option<RiskEvent>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source {source} unavailable: {message}")]
    Unavailable { source: String, message: String },
}
