//! LRU-ordered header cache, bounded by the chain's `max_reorg_depth` (§4.4).

use lru::LruCache;
use risk_types::BlockHeader;
use std::num::NonZeroUsize;

pub struct HeaderCache {
    inner: LruCache<u64, BlockHeader>,
}

impl HeaderCache {
    pub fn new(capacity: u64) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1) as usize).expect("capacity > 0");
        HeaderCache {
            inner: LruCache::new(capacity),
        }
    }

    pub fn insert(&mut self, header: BlockHeader) {
        self.inner.put(header.number, header);
    }

    pub fn get(&mut self, height: u64) -> Option<&BlockHeader> {
        self.inner.get(&height)
    }

    pub fn remove(&mut self, height: u64) {
        self.inner.pop(&height);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `count` highest cached heights strictly below `below_height`, in
    /// descending order — the re-check window for step 3 of the tick.
    pub fn heights_below(&self, below_height: u64, count: usize) -> Vec<u64> {
        let mut heights: Vec<u64> = self.inner.iter().map(|(h, _)| *h).filter(|h| *h < below_height).collect();
        heights.sort_unstable_by(|a, b| b.cmp(a));
        heights.truncate(count);
        heights
    }
}
