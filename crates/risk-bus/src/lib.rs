//! # risk-bus
//!
//! In-process event bus carrying ingestion, snapshot, reorg, and
//! quality-circuit lifecycle events (grounded in the teacher's
//! `shared-bus` crate), plus the outbound [`ports::SnapshotSink`] adapters
//! that let the window manager emit finalized snapshots without knowing
//! about the bus concretely.

#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod events;
pub mod ports;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, RiskEngineEvent};
pub use ports::{BusAndStdoutSink, SinkError, SnapshotSink, StdoutSink};
pub use publisher::{BusSnapshotSink, EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};
