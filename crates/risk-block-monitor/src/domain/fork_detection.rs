//! Fork detection and backtracking (§4.4 steps 3-4), grounded in the same
//! ancestor-search shape as a light-client header sync: scan downward from
//! the mismatch until a height both chains still agree on.

/// One height's comparison between the cached header and a freshly fetched
/// live one. `live_hash` is `None` when the block no longer exists at that
/// height on the live chain.
pub struct HeightComparison {
    pub height: u64,
    pub cached_hash: String,
    pub live_hash: Option<String>,
}

impl HeightComparison {
    pub fn matches(&self) -> bool {
        self.live_hash.as_deref() == Some(self.cached_hash.as_str())
    }
}

/// A detected fork: the last height both chains agree on, and the range of
/// heights whose events must be treated as potentially affected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkReport {
    pub fork_point: u64,
    pub detected_height: u64,
}

impl ForkReport {
    /// Inclusive `[fork_point + 1, detected_height]`.
    pub fn affected_range(&self) -> (u64, u64) {
        (self.fork_point + 1, self.detected_height)
    }
}

/// Step 3: scan `comparisons` (descending heights below head) for the first
/// mismatch. Returns the highest mismatching height, or `None` if the
/// recent window is fully consistent.
pub fn detect_mismatch(comparisons: &[HeightComparison]) -> Option<u64> {
    comparisons.iter().find(|c| !c.matches()).map(|c| c.height)
}

/// Step 4: given a detected mismatch height, backtrack through
/// `backtrack_comparisons` (also descending) until a height whose cached
/// hash still matches live, capped at `max_backtrack` blocks back. That
/// height is the fork point.
pub fn find_fork_point(detected_height: u64, backtrack_comparisons: &[HeightComparison], max_backtrack: u64) -> ForkReport {
    for comparison in backtrack_comparisons {
        if comparison.height + max_backtrack < detected_height {
            break;
        }
        if comparison.matches() {
            return ForkReport {
                fork_point: comparison.height,
                detected_height,
            };
        }
    }
    ForkReport {
        fork_point: detected_height.saturating_sub(max_backtrack),
        detected_height,
    }
}
