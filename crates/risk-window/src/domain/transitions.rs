//! The window's own OPEN -> PROVISIONAL -> FINAL transition predicates
//! (§4.7). Pure and state-pattern-matched, the same shape as the quality
//! pipeline's circuit breaker: given a window and "now", there is exactly
//! one right answer for whether a transition is allowed.

use chrono::{DateTime, Utc};
use risk_types::{TimeWindow, WindowState};

pub fn can_transition_to_provisional(window: &TimeWindow, now: DateTime<Utc>, provisional_delay_secs: i64) -> bool {
    window.state == WindowState::Open && now >= window.window_end + chrono::Duration::seconds(provisional_delay_secs)
}

pub fn can_transition_to_final(window: &TimeWindow, now: DateTime<Utc>, finalization_delay_secs: i64) -> bool {
    window.state == WindowState::Provisional
        && now >= window.window_end + chrono::Duration::seconds(finalization_delay_secs)
        && window.all_events_resolved()
}
