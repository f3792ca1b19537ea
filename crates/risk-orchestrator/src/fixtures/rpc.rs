//! Simulated chain RPC transport.
//!
//! Concrete chain RPC clients (EVM JSON-RPC, Solana's slot/block dialect,
//! ...) are out of scope (§6); this is the in-memory stand-in the
//! orchestrator wires by default so the engine is runnable end to end,
//! grounded in the teacher's `(not (feature = "rocksdb"))` in-memory
//! default-backend pattern (`node-runtime::container::subsystems`). It
//! advances a monotonic height on every poll and occasionally rewrites its
//! recent tail to exercise the reorg path, at the chain profile's
//! configured `reorg_probability`.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use risk_types::{BlockHeader, ChainProfile, ChainRpc, ChainRpcError};

/// Depth of the simulated reorg when one is triggered.
const SIMULATED_REORG_DEPTH: u64 = 3;

struct ForkState {
    /// Height at which the currently active fork label starts, if any.
    fork_from: Option<u64>,
    epoch: u64,
}

/// One chain's simulated head. Each call to [`current_height`] advances the
/// chain by one block and, with `reorg_probability`, rewrites the last
/// [`SIMULATED_REORG_DEPTH`] blocks under a new fork label.
pub struct SimulatedChainRpc {
    chain: String,
    reorg_probability: f64,
    height: AtomicU64,
    fork: Mutex<ForkState>,
}

impl SimulatedChainRpc {
    pub fn new(profile: &ChainProfile, start_height: u64) -> Self {
        SimulatedChainRpc {
            chain: profile.name.clone(),
            reorg_probability: profile.reorg_probability,
            height: AtomicU64::new(start_height),
            fork: Mutex::new(ForkState { fork_from: None, epoch: 0 }),
        }
    }

    fn hash_for(&self, height: u64, fork_from: Option<u64>, epoch: u64) -> String {
        match fork_from {
            Some(from) if height >= from => format!("{}-h{height}-fork{epoch}", self.chain),
            _ => format!("{}-h{height}", self.chain),
        }
    }
}

#[async_trait]
impl ChainRpc for SimulatedChainRpc {
    async fn current_height(&self) -> Result<u64, ChainRpcError> {
        let new_height = self.height.fetch_add(1, Ordering::SeqCst) + 1;

        if self.reorg_probability > 0.0 && new_height > SIMULATED_REORG_DEPTH {
            let roll: f64 = rand::thread_rng().gen_range(0.0..1.0);
            if roll < self.reorg_probability {
                let mut fork = self.fork.lock();
                fork.fork_from = Some(new_height.saturating_sub(SIMULATED_REORG_DEPTH));
                fork.epoch += 1;
            }
        }

        Ok(new_height)
    }

    async fn block_at(&self, height: u64) -> Result<Option<BlockHeader>, ChainRpcError> {
        let current = self.height.load(Ordering::SeqCst);
        if height > current {
            return Ok(None);
        }
        let (fork_from, epoch) = {
            let fork = self.fork.lock();
            (fork.fork_from, fork.epoch)
        };
        let hash = self.hash_for(height, fork_from, epoch);
        let parent_hash = if height == 0 {
            "genesis".to_string()
        } else {
            self.hash_for(height - 1, fork_from, epoch)
        };
        Ok(Some(BlockHeader {
            number: height,
            hash,
            parent_hash,
            timestamp: Utc::now(),
        }))
    }
}
