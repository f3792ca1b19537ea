//! The per-chain polling loop (§4.4): tracks head height, maintains the LRU
//! header cache, detects forks, and hands affected registered events off to
//! the reorg handler.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use risk_reorg::ReorgHandler;
use risk_types::{BlockHeader, ChainRpc, RiskEvent};
use tracing::{info, warn};

use crate::domain::{detect_mismatch, find_fork_point, HeaderCache, HeightComparison};
use crate::error::MonitorResult;
use crate::metrics;
use crate::ports::{NoopReplacementResolver, ReplacementResolver};

const BACKTRACK_CAP: u64 = 100;
const RECHECK_WINDOW: usize = 10;

/// Queryable statistics for one chain's monitor (§4.4 observability).
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorStats {
    pub polls: u64,
    pub reorgs_detected: u64,
    pub last_poll: Option<DateTime<Utc>>,
    pub last_reorg: Option<DateTime<Utc>>,
}

struct State {
    cache: HeaderCache,
    registered: BTreeMap<u64, Vec<RiskEvent>>,
    stats: MonitorStats,
}

/// One chain's block monitor. `rpc` is the transport; `reorg_handler` is
/// shared across chains so its version map and log stay consolidated.
pub struct BlockMonitor {
    chain: String,
    rpc: Arc<dyn ChainRpc>,
    reorg_handler: Arc<ReorgHandler>,
    replacement_resolver: Arc<dyn ReplacementResolver>,
    state: Mutex<State>,
}

impl BlockMonitor {
    /// Build a monitor with the default no-op [`ReplacementResolver`]
    /// (§9 Open Question resolution) — no concrete chain adapter is
    /// available in the core, so reorgs prune rather than correct unless
    /// [`BlockMonitor::with_replacement_resolver`] supplies one.
    pub fn new(chain: impl Into<String>, rpc: Arc<dyn ChainRpc>, reorg_handler: Arc<ReorgHandler>, max_reorg_depth: u64) -> Self {
        Self::with_replacement_resolver(chain, rpc, reorg_handler, max_reorg_depth, Arc::new(NoopReplacementResolver))
    }

    pub fn with_replacement_resolver(
        chain: impl Into<String>,
        rpc: Arc<dyn ChainRpc>,
        reorg_handler: Arc<ReorgHandler>,
        max_reorg_depth: u64,
        replacement_resolver: Arc<dyn ReplacementResolver>,
    ) -> Self {
        BlockMonitor {
            chain: chain.into(),
            rpc,
            reorg_handler,
            replacement_resolver,
            state: Mutex::new(State {
                cache: HeaderCache::new(max_reorg_depth),
                registered: BTreeMap::new(),
                stats: MonitorStats::default(),
            }),
        }
    }

    /// Register an on-chain event so a future reorg can find it by height.
    pub fn register_event(&self, event: RiskEvent) {
        let Some(block_number) = event.block_number else {
            return;
        };
        self.state.lock().registered.entry(block_number).or_default().push(event);
    }

    pub fn stats(&self) -> MonitorStats {
        self.state.lock().stats
    }

    /// One tick of the polling loop: fetch head, cache it, re-check the
    /// recent window for a fork, and route any affected events to the reorg
    /// handler. Returns correction events produced if a fork was handled.
    pub async fn tick(&self, now: DateTime<Utc>) -> MonitorResult<Vec<RiskEvent>> {
        let head = self.rpc.current_height().await?;
        let head_header = self.rpc.block_at(head).await?;

        {
            let mut state = self.state.lock();
            if let Some(header) = head_header {
                state.cache.insert(header);
            }
            state.stats.polls += 1;
            state.stats.last_poll = Some(now);
        }

        let recheck_heights = {
            let mut state = self.state.lock();
            state.cache.heights_below(head, RECHECK_WINDOW)
        };

        let mut comparisons = Vec::with_capacity(recheck_heights.len());
        for height in recheck_heights {
            let cached_hash = {
                let mut state = self.state.lock();
                state.cache.get(height).map(|h| h.hash.clone())
            };
            let Some(cached_hash) = cached_hash else { continue };
            let live = self.rpc.block_at(height).await?;
            comparisons.push(HeightComparison {
                height,
                cached_hash,
                live_hash: live.map(|h| h.hash),
            });
        }

        let Some(detected_height) = detect_mismatch(&comparisons) else {
            return Ok(Vec::new());
        };

        warn!(chain = %self.chain, height = detected_height, "fork detected");

        let mut backtrack_comparisons = Vec::new();
        let mut probe = detected_height;
        while probe > 0 && detected_height.saturating_sub(probe) <= BACKTRACK_CAP {
            probe -= 1;
            let cached_hash = {
                let mut state = self.state.lock();
                state.cache.get(probe).map(|h| h.hash.clone())
            };
            let Some(cached_hash) = cached_hash else { break };
            let live = self.rpc.block_at(probe).await?;
            let matches_live = live.as_ref().map(|h| h.hash == cached_hash).unwrap_or(false);
            backtrack_comparisons.push(HeightComparison {
                height: probe,
                cached_hash,
                live_hash: live.map(|h| h.hash),
            });
            if matches_live {
                break;
            }
        }

        let report = find_fork_point(detected_height, &backtrack_comparisons, BACKTRACK_CAP);
        let (range_start, range_end) = report.affected_range();

        let mut affected_events: Vec<RiskEvent> = {
            let mut state = self.state.lock();
            let heights: Vec<u64> = state.registered.range(range_start..=range_end).map(|(h, _)| *h).collect();
            let mut events = Vec::new();
            for height in heights {
                if let Some(mut evs) = state.registered.remove(&height) {
                    events.append(&mut evs);
                }
            }
            state.stats.reorgs_detected += 1;
            state.stats.last_reorg = Some(now);
            for height in range_start..=range_end {
                state.cache.remove(height);
            }
            events
        };

        metrics::record_reorg(&self.chain);
        info!(chain = %self.chain, fork_point = report.fork_point, detected_height, affected = affected_events.len(), "reorg handled");

        let replacements = self
            .replacement_resolver
            .resolve(&self.chain, range_start, range_end)
            .await;

        let corrections = self.reorg_handler.handle_reorg(
            &self.chain,
            &mut affected_events,
            replacements.as_deref(),
            report.fork_point,
            detected_height,
            now,
        );
        Ok(corrections)
    }
}
