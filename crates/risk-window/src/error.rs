//! Error surface for the window manager (§4.7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("window {window_id} is not OPEN")]
    NotOpen { window_id: String },

    #[error("unknown coin: {coin}")]
    UnknownCoin { coin: String },

    #[error("unknown chain: {chain}")]
    UnknownChain { chain: String },

    #[error("window {window_id} is at capacity ({max} events)")]
    AtCapacity { window_id: String, max: usize },

    #[error(transparent)]
    Finality(#[from] risk_finality::FinalityError),
}

pub type WindowResult<T> = Result<T, WindowError>;
