//! Backpressure / circuit-breaker companion facility (§4.2), used by source
//! collaborators to shield the pipeline from a repeatedly-failing source.
//!
//! The state machine itself is a pure `process_event`/`next_state` pair,
//! the same shape used for the window manager's state machine — a circuit
//! breaker and a window are both "apply an event, get a new state" problems.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy)]
pub enum CircuitEvent {
    Success,
    Failure,
}

/// Per-source failure tracking and circuit state. One instance per named
/// source, held in a map guarded by the service's mutex (§5).
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    state: CircuitState,
    failure_count: u32,
    opened_at: Option<DateTime<Utc>>,
    failure_threshold: u32,
    cooldown_secs: i64,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, cooldown_secs: i64) -> Self {
        CircuitBreaker {
            state: CircuitState::Closed,
            failure_count: 0,
            opened_at: None,
            failure_threshold,
            cooldown_secs,
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }

    /// Whether a call should be attempted right now. `Open` before cooldown
    /// fails fast; `Open` past cooldown transitions to `HalfOpen` and allows
    /// exactly one probe.
    pub fn should_attempt(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let elapsed = self
                    .opened_at
                    .map(|t| (now - t).num_seconds())
                    .unwrap_or(i64::MAX);
                if elapsed >= self.cooldown_secs {
                    self.state = CircuitState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Pure transition function, deterministic given the same
    /// (state, event) pair regardless of which instance applies it.
    pub fn process_event(&mut self, event: CircuitEvent, now: DateTime<Utc>) {
        self.state = Self::next_state(self.state, event, &mut self.failure_count, self.failure_threshold);
        if self.state == CircuitState::Open && self.opened_at.is_none() {
            self.opened_at = Some(now);
        }
        if self.state != CircuitState::Open {
            self.opened_at = None;
        }
    }

    fn next_state(
        state: CircuitState,
        event: CircuitEvent,
        failure_count: &mut u32,
        threshold: u32,
    ) -> CircuitState {
        match (state, event) {
            (_, CircuitEvent::Success) => {
                *failure_count = 0;
                CircuitState::Closed
            }
            (CircuitState::Closed, CircuitEvent::Failure) | (CircuitState::HalfOpen, CircuitEvent::Failure) => {
                *failure_count += 1;
                if *failure_count >= threshold {
                    CircuitState::Open
                } else {
                    CircuitState::Closed
                }
            }
            (CircuitState::Open, CircuitEvent::Failure) => CircuitState::Open,
        }
    }
}

/// Exponential backoff delay for retry attempt `attempt` (0-indexed),
/// `base^attempt` seconds.
pub fn backoff_delay(base: f64, attempt: u32) -> std::time::Duration {
    std::time::Duration::from_secs_f64(base.powi(attempt as i32))
}
