//! Behavior shared by every [`FrontierStore`] backend

use crate::{error::StoreError, store::FrontierStore};
use tonsub_chain::{MASTERCHAIN_SHARD, MASTERCHAIN_WORKCHAIN, ShardBlockKey};

fn shard_key(seqno: u32) -> ShardBlockKey {
    ShardBlockKey::new(0, MASTERCHAIN_SHARD, seqno)
}

pub(crate) async fn run_all(store: &dyn FrontierStore) {
    master_heights(store).await;
    store.reset().await.unwrap();
    seed_is_idempotent(store).await;
    store.reset().await.unwrap();
    masterchain_keys_never_enter_frontier(store).await;
    store.reset().await.unwrap();
    merge_enqueues_both_predecessors(store).await;
    store.reset().await.unwrap();
    unknown_shard_block(store).await;
    store.reset().await.unwrap();
    drain(store).await;
    reset_clears_everything(store).await;
}

async fn master_heights(store: &dyn FrontierStore) {
    assert_eq!(store.last_processed_master_height().await.unwrap(), None);
    store.record_master_height(101).await.unwrap();
    store.record_master_height(102).await.unwrap();
    assert!(matches!(store.record_master_height(102).await, Err(StoreError::DuplicateHeight(102))));
    assert!(matches!(store.record_master_height(101).await, Err(StoreError::DuplicateHeight(101))));
    assert_eq!(store.last_processed_master_height().await.unwrap(), Some(102));
    // No ordering is enforced by the store
    store.record_master_height(7).await.unwrap();
    assert_eq!(store.last_processed_master_height().await.unwrap(), Some(102));
}

async fn seed_is_idempotent(store: &dyn FrontierStore) {
    let key = shard_key(10);
    store.seed_shard_blocks(&[key, key]).await.unwrap();
    store.seed_shard_blocks(&[key]).await.unwrap();
    assert_eq!(store.next_pending_shard_block().await.unwrap(), Some(key));
    // Not marked yet, so it keeps being returned
    assert_eq!(store.next_pending_shard_block().await.unwrap(), Some(key));

    store.mark_shard_block_processed(key, &[]).await.unwrap();
    assert_eq!(store.next_pending_shard_block().await.unwrap(), None);

    // Seeding a processed block does not reset it to pending
    store.seed_shard_blocks(&[key]).await.unwrap();
    assert_eq!(store.next_pending_shard_block().await.unwrap(), None);
    store.mark_shard_block_processed(key, &[]).await.unwrap();
}

async fn masterchain_keys_never_enter_frontier(store: &dyn FrontierStore) {
    let master = ShardBlockKey::new(MASTERCHAIN_WORKCHAIN, MASTERCHAIN_SHARD, 100);
    store.seed_shard_blocks(&[master]).await.unwrap();
    assert_eq!(store.next_pending_shard_block().await.unwrap(), None);
    assert!(matches!(store.mark_shard_block_processed(master, &[]).await, Err(StoreError::UnknownShardBlock(_))));

    let key = shard_key(1);
    store.seed_shard_blocks(&[key]).await.unwrap();
    store.mark_shard_block_processed(key, &[master]).await.unwrap();
    assert_eq!(store.next_pending_shard_block().await.unwrap(), None);
}

async fn merge_enqueues_both_predecessors(store: &dyn FrontierStore) {
    let merged = shard_key(50);
    let left = ShardBlockKey::new(0, -4_611_686_018_427_387_904, 49);
    let right = ShardBlockKey::new(0, 4_611_686_018_427_387_904, 47);
    store.seed_shard_blocks(&[merged]).await.unwrap();
    store.mark_shard_block_processed(merged, &[left, right]).await.unwrap();

    let mut pending = vec![];
    while let Some(key) = store.next_pending_shard_block().await.unwrap() {
        store.mark_shard_block_processed(key, &[]).await.unwrap();
        pending.push(key);
    }
    pending.sort();
    assert_eq!(pending, vec![left, right]);
}

async fn unknown_shard_block(store: &dyn FrontierStore) {
    let key = shard_key(3);
    assert!(matches!(store.mark_shard_block_processed(key, &[shard_key(2)]).await, Err(StoreError::UnknownShardBlock(k)) if k == key));
    // A failed mark seeds nothing
    assert_eq!(store.next_pending_shard_block().await.unwrap(), None);
}

/// Drains a 5 block DAG reachable from 2 seeded entries
async fn drain(store: &dyn FrontierStore) {
    let (a, b, c, d, e) = (shard_key(5), ShardBlockKey::new(0, 1, 5), shard_key(4), ShardBlockKey::new(0, 1, 4), shard_key(3));
    let parents = |key: ShardBlockKey| match key {
        k if k == a => vec![c, d],
        k if k == b => vec![d],
        k if k == c => vec![e],
        _ => vec![],
    };
    store.seed_shard_blocks(&[a, b]).await.unwrap();
    let mut processed = vec![];
    while let Some(key) = store.next_pending_shard_block().await.unwrap() {
        store.mark_shard_block_processed(key, &parents(key)).await.unwrap();
        processed.push(key);
    }
    processed.sort();
    let mut expected = vec![a, b, c, d, e];
    expected.sort();
    assert_eq!(processed, expected);
}

async fn reset_clears_everything(store: &dyn FrontierStore) {
    store.record_master_height(200).await.unwrap();
    store.seed_shard_blocks(&[shard_key(77)]).await.unwrap();
    store.reset().await.unwrap();
    assert_eq!(store.last_processed_master_height().await.unwrap(), None);
    assert_eq!(store.next_pending_shard_block().await.unwrap(), None);
    // Heights can be recorded again after a reset
    store.record_master_height(200).await.unwrap();
    store.reset().await.unwrap();
}
