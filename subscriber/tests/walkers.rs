mod common;

use async_trait::async_trait;
use common::*;
use std::{sync::Arc, time::Duration};
use tonsub_chain::{BlockIdExt, Seqno, ShardBlockKey};
use tonsub_provider::mock::{MockCall, MockProvider};
use tonsub_store::{FrontierStore, MemoryFrontierStore, StoreResult};
use tonsub_subscriber::{ErrorKind, MasterchainWalker, ShardchainWalker, SubscriberError, TickOutcome};

const INTERVAL: Duration = Duration::from_millis(5);
const CUTOFF: u64 = 1_000;

fn masterchain_provider(tips: impl IntoIterator<Item = Seqno>, heights: std::ops::RangeInclusive<Seqno>) -> MockProvider {
    let provider = MockProvider::with_tips(tips);
    for seqno in heights {
        provider.add_master_block(seqno, CUTOFF + seqno as u64, vec![]);
    }
    provider
}

/// Ticks the shardchain walker until the frontier is empty
async fn drain_frontier(walker: &ShardchainWalker) -> Vec<TickOutcome> {
    let mut outcomes = vec![];
    loop {
        match walker.tick().await.unwrap() {
            TickOutcome::Idle => return outcomes,
            outcome => outcomes.push(outcome),
        }
    }
}

#[tokio::test]
async fn test_masterchain_heights_announced_once_in_order() {
    let harness = Harness::new(masterchain_provider([101, 103, 103, 106], 100..=106));
    let walker = MasterchainWalker::new(harness.context(100, CUTOFF), INTERVAL);

    assert_eq!(walker.tick().await.unwrap(), TickOutcome::Advanced { from: 101, to: 101 });

    // Height 102 fails before being recorded, so the next tick retries it
    harness.provider.fail_next(MockCall::Shards, 1);
    let err = walker.tick().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert_eq!(harness.store.last_processed_master_height().await.unwrap(), Some(101));
    assert_eq!(walker.tick().await.unwrap(), TickOutcome::Advanced { from: 102, to: 103 });

    harness.provider.fail_next(MockCall::MasterchainInfo, 1);
    assert!(matches!(walker.tick().await, Err(SubscriberError::Provider(_))));
    assert_eq!(walker.tick().await.unwrap(), TickOutcome::Advanced { from: 104, to: 106 });
    assert_eq!(walker.tick().await.unwrap(), TickOutcome::Idle);

    assert_eq!(master_seqnos(&harness.drain()), (101..=106).collect::<Vec<_>>());
    assert_eq!(harness.store.last_processed_master_height().await.unwrap(), Some(106));
}

#[tokio::test]
async fn test_masterchain_resumes_from_store() {
    let harness = Harness::new(masterchain_provider([105], 100..=105));
    harness.store.record_master_height(103).await.unwrap();
    let walker = MasterchainWalker::new(harness.context(100, CUTOFF), INTERVAL);

    assert_eq!(walker.tick().await.unwrap(), TickOutcome::Advanced { from: 104, to: 105 });
    assert_eq!(master_seqnos(&harness.drain()), vec![104, 105]);
}

#[tokio::test]
async fn test_masterchain_seeds_frontier() {
    let provider = MockProvider::with_tips([101]);
    provider.add_master_block(100, CUTOFF, vec![]);
    provider.add_master_block(101, CUTOFF + 10, vec![shard_id(LEFT, 50), shard_id(RIGHT, 47), BlockIdExt::masterchain(101)]);
    let harness = Harness::new(provider);
    let walker = MasterchainWalker::new(harness.context(100, CUTOFF), INTERVAL);

    walker.tick().await.unwrap();
    let notifications = harness.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].header().end_lt, CUTOFF + 10);
    assert_eq!(take_pending(harness.store.as_ref()).await, vec![shard_key(LEFT, 50), shard_key(RIGHT, 47)]);
}

/// Loses track of the processed heights, replaying the walk from the session start
#[derive(Debug, Default)]
struct ForgetfulStore {
    inner: MemoryFrontierStore,
}

#[async_trait]
impl FrontierStore for ForgetfulStore {
    async fn last_processed_master_height(&self) -> StoreResult<Option<Seqno>> {
        Ok(None)
    }

    async fn record_master_height(&self, seqno: Seqno) -> StoreResult<()> {
        self.inner.record_master_height(seqno).await
    }

    async fn seed_shard_blocks(&self, keys: &[ShardBlockKey]) -> StoreResult<()> {
        self.inner.seed_shard_blocks(keys).await
    }

    async fn next_pending_shard_block(&self) -> StoreResult<Option<ShardBlockKey>> {
        self.inner.next_pending_shard_block().await
    }

    async fn mark_shard_block_processed(&self, key: ShardBlockKey, ancestors: &[ShardBlockKey]) -> StoreResult<()> {
        self.inner.mark_shard_block_processed(key, ancestors).await
    }

    async fn reset(&self) -> StoreResult<()> {
        self.inner.reset().await
    }
}

#[tokio::test]
async fn test_duplicate_height_is_consistency_error() {
    let harness = Harness::with_store(masterchain_provider([101], 100..=101), Arc::new(ForgetfulStore::default()));
    let walker = MasterchainWalker::new(harness.context(100, CUTOFF), INTERVAL);

    assert_eq!(walker.tick().await.unwrap(), TickOutcome::Advanced { from: 101, to: 101 });
    for _ in 0..2 {
        let err = walker.tick().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Consistency);
        assert!(matches!(err, SubscriberError::Store(tonsub_store::StoreError::DuplicateHeight(101))));
    }
    assert_eq!(master_seqnos(&harness.drain()), vec![101]);
}

#[tokio::test]
async fn test_merge_enqueues_both_predecessors() {
    let provider = MockProvider::new();
    provider.add_shard_block(shard_id(0, 50), 2_000, vec![shard_id(LEFT, 49), shard_id(RIGHT, 47)]);
    let harness = Harness::new(provider);
    harness.store.seed_shard_blocks(&[shard_key(0, 50)]).await.unwrap();
    let walker = ShardchainWalker::new(harness.context(100, CUTOFF), INTERVAL);

    assert_eq!(walker.tick().await.unwrap(), TickOutcome::ShardProcessed(shard_key(0, 50)));
    assert_eq!(shard_keys(&harness.drain()), vec![shard_key(0, 50)]);
    assert_eq!(take_pending(harness.store.as_ref()).await, vec![shard_key(LEFT, 49), shard_key(RIGHT, 47)]);
}

#[tokio::test]
async fn test_blocks_before_cutoff_are_pruned() {
    let provider = MockProvider::new();
    provider.add_shard_block(shard_id(LEFT, 10), CUTOFF - 1, vec![shard_id(LEFT, 9)]);
    provider.add_shard_block(shard_id(RIGHT, 20), CUTOFF, vec![shard_id(RIGHT, 19)]);
    provider.add_shard_block(shard_id(RIGHT, 19), CUTOFF - 100, vec![shard_id(RIGHT, 18)]);
    let harness = Harness::new(provider);
    harness.store.seed_shard_blocks(&[shard_key(LEFT, 10), shard_key(RIGHT, 20)]).await.unwrap();
    let walker = ShardchainWalker::new(harness.context(100, CUTOFF), INTERVAL);

    assert_eq!(
        drain_frontier(&walker).await,
        vec![
            TickOutcome::ShardPruned(shard_key(LEFT, 10)),
            TickOutcome::ShardProcessed(shard_key(RIGHT, 20)),
            TickOutcome::ShardPruned(shard_key(RIGHT, 19)),
        ]
    );
    assert_eq!(shard_keys(&harness.drain()), vec![shard_key(RIGHT, 20)]);
    // Predecessors of pruned blocks are never fetched
    assert_eq!(harness.provider.call_count(MockCall::ShardHeader), 3);
}

#[tokio::test]
async fn test_dag_drained_once_per_block() {
    // a -> {c, d}, b -> {d}, c -> {e}, d -> {e}, e -> {f}, f predates the session
    let (a, b, c, d, e, f) =
        (shard_id(LEFT, 12), shard_id(RIGHT, 12), shard_id(LEFT, 11), shard_id(RIGHT, 11), shard_id(0, 10), shard_id(0, 9));
    let provider = MockProvider::new();
    provider.add_shard_block(a.clone(), 1_500, vec![c.clone(), d.clone()]);
    provider.add_shard_block(b.clone(), 1_500, vec![d.clone()]);
    provider.add_shard_block(c.clone(), 1_400, vec![e.clone()]);
    provider.add_shard_block(d.clone(), 1_400, vec![e.clone()]);
    provider.add_shard_block(e.clone(), 1_300, vec![f.clone()]);
    provider.add_shard_block(f.clone(), 900, vec![shard_id(0, 8)]);
    let harness = Harness::new(provider);
    harness.store.seed_shard_blocks(&[ShardBlockKey::from(&a), ShardBlockKey::from(&b)]).await.unwrap();
    let walker = ShardchainWalker::new(harness.context(100, CUTOFF), INTERVAL);

    let outcomes = drain_frontier(&walker).await;
    assert_eq!(outcomes.len(), 6);
    assert_eq!(outcomes.last(), Some(&TickOutcome::ShardPruned(ShardBlockKey::from(&f))));

    let mut announced = shard_keys(&harness.drain());
    announced.sort();
    let mut expected = [&a, &b, &c, &d, &e].map(ShardBlockKey::from).to_vec();
    expected.sort();
    assert_eq!(announced, expected);
    assert_eq!(harness.store.next_pending_shard_block().await.unwrap(), None);
}

#[tokio::test]
async fn test_shard_failure_keeps_block_pending() {
    let provider = MockProvider::new();
    provider.add_shard_block(shard_id(LEFT, 10), 2_000, vec![]);
    let harness = Harness::new(provider);
    harness.store.seed_shard_blocks(&[shard_key(LEFT, 10)]).await.unwrap();
    let walker = ShardchainWalker::new(harness.context(100, CUTOFF), INTERVAL);

    harness.provider.fail_next(MockCall::ShardHeader, 1);
    assert_eq!(walker.tick().await.unwrap_err().kind(), ErrorKind::Transient);
    assert_eq!(harness.store.next_pending_shard_block().await.unwrap(), Some(shard_key(LEFT, 10)));
    assert!(harness.drain().is_empty());

    assert_eq!(walker.tick().await.unwrap(), TickOutcome::ShardProcessed(shard_key(LEFT, 10)));
    assert_eq!(walker.tick().await.unwrap(), TickOutcome::Idle);
    assert_eq!(shard_keys(&harness.drain()), vec![shard_key(LEFT, 10)]);
}

#[tokio::test]
async fn test_walkers_end_to_end() {
    let provider = MockProvider::with_tips([101, 102, 103]);
    provider.add_master_block(100, CUTOFF, vec![shard_id(LEFT, 100)]);
    provider.add_shard_block(shard_id(LEFT, 100), CUTOFF - 10, vec![shard_id(LEFT, 99)]);
    for seqno in 101..=103 {
        provider.add_master_block(seqno, CUTOFF + 100 * seqno as u64, vec![shard_id(LEFT, seqno)]);
        provider.add_shard_block(shard_id(LEFT, seqno), CUTOFF + 100 * seqno as u64 - 50, vec![shard_id(LEFT, seqno - 1)]);
    }
    let harness = Harness::new(provider);
    let ctx = harness.context(100, CUTOFF);
    let masterchain = MasterchainWalker::new(ctx.clone(), INTERVAL);
    let shardchain = ShardchainWalker::new(ctx, INTERVAL);

    for _ in 0..3 {
        assert!(matches!(masterchain.tick().await.unwrap(), TickOutcome::Advanced { .. }));
        drain_frontier(&shardchain).await;
    }
    assert_eq!(masterchain.tick().await.unwrap(), TickOutcome::Idle);

    let notifications = harness.drain();
    assert_eq!(master_seqnos(&notifications), vec![101, 102, 103]);
    assert_eq!(shard_keys(&notifications), vec![shard_key(LEFT, 101), shard_key(LEFT, 102), shard_key(LEFT, 103)]);
    assert_eq!(harness.store.last_processed_master_height().await.unwrap(), Some(103));
    assert_eq!(harness.store.next_pending_shard_block().await.unwrap(), None);
}
