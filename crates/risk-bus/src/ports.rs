//! The outbound snapshot port (§ Telemetry / emitted snapshot stream): one
//! `AggregatedRiskSnapshot` per FINAL window, canonically as line-delimited
//! JSON.

use async_trait::async_trait;
use risk_types::AggregatedRiskSnapshot;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("sink write failed: {0}")]
    Write(String),
}

#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn publish(&self, snapshot: &AggregatedRiskSnapshot) -> Result<(), SinkError>;
}

/// Default adapter: one NDJSON line per snapshot on stdout.
pub struct StdoutSink;

#[async_trait]
impl SnapshotSink for StdoutSink {
    async fn publish(&self, snapshot: &AggregatedRiskSnapshot) -> Result<(), SinkError> {
        let line = serde_json::to_string(snapshot)?;
        println!("{line}");
        Ok(())
    }
}

/// Adapter that also fans the snapshot out on the in-process bus, for
/// consumers wanting a live subscription alongside the NDJSON stream.
pub struct BusAndStdoutSink {
    bus: std::sync::Arc<crate::publisher::InMemoryEventBus>,
}

impl BusAndStdoutSink {
    pub fn new(bus: std::sync::Arc<crate::publisher::InMemoryEventBus>) -> Self {
        BusAndStdoutSink { bus }
    }
}

#[async_trait]
impl SnapshotSink for BusAndStdoutSink {
    async fn publish(&self, snapshot: &AggregatedRiskSnapshot) -> Result<(), SinkError> {
        let line = serde_json::to_string(snapshot).map_err(SinkError::Serialize)?;
        println!("{line}");
        use crate::publisher::EventPublisher;
        let receivers = self.bus.publish(crate::events::RiskEngineEvent::SnapshotFinalized(snapshot.clone())).await;
        if receivers == 0 {
            error!(snapshot_id = %snapshot.snapshot_id, "no bus subscribers for finalized snapshot");
        }
        Ok(())
    }
}
