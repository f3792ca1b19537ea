//! Error surface for the block monitor (§4.4).

use thiserror::Error;
use risk_types::ChainRpcError;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("unknown chain: {chain}")]
    UnknownChain { chain: String },

    #[error(transparent)]
    Rpc(#[from] ChainRpcError),
}

pub type MonitorResult<T> = Result<T, MonitorError>;
