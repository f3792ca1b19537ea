//! Window alignment (§4.7): a timestamp belongs to the window whose start
//! is `floor(t / W) * W`. Windows are contiguous and non-overlapping by
//! construction (invariant 8, §8) — this is the only place a timestamp is
//! mapped to a window, so there is nowhere for two windows to claim it.

use chrono::{DateTime, TimeZone, Utc};

/// Compute `(window_id, window_start, window_end)` for `timestamp` given a
/// window size in seconds.
pub fn window_bounds(timestamp: DateTime<Utc>, size_secs: i64) -> (String, DateTime<Utc>, DateTime<Utc>) {
    let epoch_secs = timestamp.timestamp();
    let aligned = (epoch_secs.div_euclid(size_secs)) * size_secs;
    let start = Utc.timestamp_opt(aligned, 0).single().expect("valid aligned timestamp");
    let end = start + chrono::Duration::seconds(size_secs);
    (start.to_rfc3339(), start, end)
}
