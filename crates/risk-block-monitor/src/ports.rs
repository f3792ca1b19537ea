//! The `ReplacementResolver` port (§9 Open Question resolution): a
//! chain-agnostic seam the block monitor calls into after detecting a fork,
//! to try to re-derive replacement events for the affected height range via
//! the ordinary data-source contract (§6) before handing off to
//! [`risk_reorg::ReorgHandler`]. Keeps the handler itself synchronous, pure,
//! and free of I/O.

use async_trait::async_trait;
use risk_types::RiskEvent;

/// Given a chain and the height range a reorg invalidated, try to produce
/// replacement events. Concrete chain adapters (re-querying the new
/// canonical chain at the same heights, §9) are out of scope for the core;
/// this is the contract they implement.
#[async_trait]
pub trait ReplacementResolver: Send + Sync {
    async fn resolve(&self, chain: &str, range_start: u64, range_end: u64) -> Option<Vec<RiskEvent>>;
}

/// Default/fixture resolver: always returns `None`. Stands in until a
/// chain-specific adapter is wired in; `ReorgHandler::handle_reorg` already
/// treats a `None` replacement set as "prune, don't correct" (§4.5).
pub struct NoopReplacementResolver;

#[async_trait]
impl ReplacementResolver for NoopReplacementResolver {
    async fn resolve(&self, _chain: &str, _range_start: u64, _range_end: u64) -> Option<Vec<RiskEvent>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_resolver_never_produces_replacements() {
        let resolver = NoopReplacementResolver;
        assert!(resolver.resolve("ethereum", 100, 103).await.is_none());
    }
}
