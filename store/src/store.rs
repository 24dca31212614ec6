use crate::error::StoreResult;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tonsub_chain::{Seqno, ShardBlockKey};

/// Persistent progress of a subscription.
///
/// Tracks the processed masterchain heights and the shard block frontier: every discovered
/// shard block is either pending or processed. Each operation is atomic on its own.
#[async_trait]
pub trait FrontierStore: Send + Sync + Debug {
    /// Highest recorded masterchain height
    async fn last_processed_master_height(&self) -> StoreResult<Option<Seqno>>;

    /// Records a processed masterchain height, failing with `DuplicateHeight` if it is already recorded.
    ///
    /// Heights are not checked for ordering.
    async fn record_master_height(&self, seqno: Seqno) -> StoreResult<()>;

    /// Inserts unknown shard blocks as pending. Masterchain and already known keys are skipped.
    async fn seed_shard_blocks(&self, keys: &[ShardBlockKey]) -> StoreResult<()>;

    /// Any pending shard block, possibly the same one on repeated calls
    async fn next_pending_shard_block(&self) -> StoreResult<Option<ShardBlockKey>>;

    /// Flips a known shard block to processed and seeds its ancestors in the same operation.
    ///
    /// Fails with `UnknownShardBlock` if `key` was never seeded.
    async fn mark_shard_block_processed(&self, key: ShardBlockKey, ancestors: &[ShardBlockKey]) -> StoreResult<()>;

    /// Clears all records
    async fn reset(&self) -> StoreResult<()>;
}

pub type DynFrontierStore = Arc<dyn FrontierStore>;

/// Keys eligible to enter the frontier
pub(crate) fn shardchain_keys(keys: &[ShardBlockKey]) -> impl Iterator<Item = &ShardBlockKey> {
    keys.iter().filter(|key| !key.is_masterchain())
}
