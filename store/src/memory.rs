use crate::{
    error::{StoreError, StoreResult},
    store::{FrontierStore, shardchain_keys},
};
use async_trait::async_trait;
use indexmap::IndexSet;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, hash_map::Entry};
use tonsub_chain::{Seqno, ShardBlockKey};

#[derive(Debug, Default)]
struct Frontier {
    heights: BTreeSet<Seqno>,
    /// Known shard blocks and whether they were processed
    blocks: HashMap<ShardBlockKey, bool>,
    /// Pending shard blocks in discovery order
    pending: IndexSet<ShardBlockKey>,
}

impl Frontier {
    fn seed(&mut self, keys: &[ShardBlockKey]) {
        for key in shardchain_keys(keys) {
            if let Entry::Vacant(entry) = self.blocks.entry(*key) {
                entry.insert(false);
                self.pending.insert(*key);
            }
        }
    }
}

/// Ephemeral [`FrontierStore`] living in the process memory
#[derive(Debug, Default)]
pub struct MemoryFrontierStore {
    inner: Mutex<Frontier>,
}

impl MemoryFrontierStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FrontierStore for MemoryFrontierStore {
    async fn last_processed_master_height(&self) -> StoreResult<Option<Seqno>> {
        Ok(self.inner.lock().heights.last().copied())
    }

    async fn record_master_height(&self, seqno: Seqno) -> StoreResult<()> {
        match self.inner.lock().heights.insert(seqno) {
            true => Ok(()),
            false => Err(StoreError::DuplicateHeight(seqno)),
        }
    }

    async fn seed_shard_blocks(&self, keys: &[ShardBlockKey]) -> StoreResult<()> {
        self.inner.lock().seed(keys);
        Ok(())
    }

    async fn next_pending_shard_block(&self) -> StoreResult<Option<ShardBlockKey>> {
        Ok(self.inner.lock().pending.first().copied())
    }

    async fn mark_shard_block_processed(&self, key: ShardBlockKey, ancestors: &[ShardBlockKey]) -> StoreResult<()> {
        let mut frontier = self.inner.lock();
        match frontier.blocks.get_mut(&key) {
            Some(processed) => *processed = true,
            None => return Err(StoreError::UnknownShardBlock(key)),
        }
        frontier.pending.shift_remove(&key);
        frontier.seed(ancestors);
        Ok(())
    }

    async fn reset(&self) -> StoreResult<()> {
        *self.inner.lock() = Frontier::default();
        Ok(())
    }
}
