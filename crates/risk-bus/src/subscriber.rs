//! Subscription handle for receiving bus events (grounded in the teacher's
//! `shared-bus::subscriber`).

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use crate::events::{EventFilter, RiskEngineEvent};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("event bus closed")]
    Closed,
}

/// A filtered handle onto the broadcast channel. Lagging subscribers skip
/// missed events rather than erroring — this is a best-effort live feed,
/// not a durable log.
pub struct Subscription {
    receiver: broadcast::Receiver<RiskEngineEvent>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<RiskEngineEvent>, filter: EventFilter) -> Self {
        Subscription { receiver, filter }
    }

    pub async fn recv(&mut self) -> Option<RiskEngineEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "subscriber lagged, events dropped");
                    continue;
                }
            };
            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    pub fn try_recv(&mut self) -> Result<Option<RiskEngineEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => return Err(SubscriptionError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };
            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}
