//! In-memory event bus built on `tokio::sync::broadcast` (grounded in the
//! teacher's `shared-bus::publisher::InMemoryEventBus`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::events::{EventFilter, RiskEngineEvent};
use crate::subscriber::Subscription;

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: RiskEngineEvent) -> usize;
    fn events_published(&self) -> u64;
}

/// Single-process fan-out bus. Suitable as the default wiring; a
/// distributed deployment would swap in a different `EventPublisher`.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<RiskEngineEvent>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        InMemoryEventBus {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        Subscription::new(receiver, filter)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: RiskEngineEvent) -> usize {
        let topic = event.topic();
        self.events_published.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(?topic, receivers, "event published");
                receivers
            }
            Err(_) => {
                warn!(?topic, "event dropped, no receivers");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

/// Adapts the bus as a [`risk_types::ports`]-style outbound sink for
/// finalized snapshots, so the window manager doesn't need to know about
/// the bus type directly.
pub struct BusSnapshotSink {
    bus: Arc<InMemoryEventBus>,
}

impl BusSnapshotSink {
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        BusSnapshotSink { bus }
    }

    pub async fn publish(&self, snapshot: risk_types::AggregatedRiskSnapshot) -> usize {
        self.bus.publish(RiskEngineEvent::SnapshotFinalized(snapshot)).await
    }
}
