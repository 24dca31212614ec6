#![allow(dead_code)]

use async_channel::Receiver;
use std::{sync::Arc, time::Duration};
use tonsub_chain::{BlockIdExt, Lt, Seqno, ShardBlockKey};
use tonsub_core::{log::try_init_logger, task::tick::TickService};
use tonsub_notify::{listener::ChannelListener, notification::Notification, notifier::Notifier};
use tonsub_provider::mock::MockProvider;
use tonsub_store::{FrontierStore, MemoryFrontierStore};
use tonsub_subscriber::{SessionCursor, WalkerContext};

/// Shard prefixes of a workchain split in two
pub const LEFT: i64 = -4_611_686_018_427_387_904;
pub const RIGHT: i64 = 4_611_686_018_427_387_904;

pub fn init_logger() {
    try_init_logger("info");
}

pub fn shard_id(shard: i64, seqno: Seqno) -> BlockIdExt {
    BlockIdExt::new(0, shard, seqno)
}

pub fn shard_key(shard: i64, seqno: Seqno) -> ShardBlockKey {
    ShardBlockKey::new(0, shard, seqno)
}

/// Walker dependencies wired to a mock provider, a memory store and a channel listener
pub struct Harness {
    pub provider: Arc<MockProvider>,
    pub store: Arc<dyn FrontierStore>,
    pub notifier: Arc<Notifier>,
    pub receiver: Receiver<Notification>,
}

impl Harness {
    pub fn new(provider: MockProvider) -> Self {
        Self::with_store(provider, Arc::new(MemoryFrontierStore::new()))
    }

    pub fn with_store(provider: MockProvider, store: Arc<dyn FrontierStore>) -> Self {
        init_logger();
        let notifier = Arc::new(Notifier::new("test"));
        let (listener, receiver) = ChannelListener::unbounded();
        notifier.register_new_listener(Arc::new(listener));
        Self { provider: Arc::new(provider), store, notifier, receiver }
    }

    pub fn context(&self, start_seqno: Seqno, start_lt: Lt) -> Arc<WalkerContext> {
        Arc::new(WalkerContext::new(
            self.provider.clone(),
            self.store.clone(),
            self.notifier.clone(),
            SessionCursor::new(start_seqno, start_lt),
            TickService::new(),
        ))
    }

    /// Notifications published so far
    pub fn drain(&self) -> Vec<Notification> {
        std::iter::from_fn(|| self.receiver.try_recv().ok()).collect()
    }
}

pub fn master_seqnos(notifications: &[Notification]) -> Vec<Seqno> {
    notifications.iter().filter_map(|x| matches!(x, Notification::MasterBlock(_)).then(|| x.id().seqno)).collect()
}

pub fn shard_keys(notifications: &[Notification]) -> Vec<ShardBlockKey> {
    notifications.iter().filter_map(|x| matches!(x, Notification::ShardBlock(_)).then(|| ShardBlockKey::from(x.id()))).collect()
}

pub async fn recv(receiver: &Receiver<Notification>) -> Notification {
    tokio::time::timeout(Duration::from_secs(10), receiver.recv()).await.expect("no notification in time").expect("channel closed")
}

/// Pending frontier entries, emptying the frontier
pub async fn take_pending(store: &dyn FrontierStore) -> Vec<ShardBlockKey> {
    let mut pending = vec![];
    while let Some(key) = store.next_pending_shard_block().await.unwrap() {
        store.mark_shard_block_processed(key, &[]).await.unwrap();
        pending.push(key);
    }
    pending.sort();
    pending
}
