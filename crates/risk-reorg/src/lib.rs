//! # risk-reorg
//!
//! Invalidates events caught in a chain reorganization and, when a
//! replacement can be matched, emits a version-bumped correction under the
//! same `event_id` (§4.5). Fetching the replacement data is explicitly out
//! of scope here — see [`ReorgHandler::handle_reorg`].

#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod domain;

pub use domain::{ReorgHandler, ReorgRecord, ReorgStats};
