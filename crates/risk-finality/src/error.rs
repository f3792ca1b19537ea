//! Error taxonomy for the finality tracker (§7).

use risk_types::ChainRpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinalityError {
    #[error("unknown chain profile: {chain}")]
    UnknownChain { chain: String },

    #[error("transport error while refreshing finality: {0}")]
    Transport(#[from] ChainRpcError),
}

pub type FinalityResult<T> = Result<T, FinalityError>;
