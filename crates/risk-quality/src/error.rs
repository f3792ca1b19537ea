//! Quality-pipeline errors. Per §7, `QualityViolation` never propagates as a
//! hard error — normalization/dedup/outlier handling is absorbed inline and
//! surfaced only as `tracing` events. This enum exists for the backpressure
//! facility, whose `CircuitOpen` condition callers do need to observe.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QualityError {
    #[error("circuit open for source {source}, retry after {cooldown_secs}s")]
    CircuitOpen { source: String, cooldown_secs: i64 },

    #[error("source {source} failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        source: String,
        attempts: u32,
        message: String,
    },
}

pub type QualityResult<T> = Result<T, QualityError>;
