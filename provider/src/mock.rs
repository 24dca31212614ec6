use crate::{
    error::{ProviderError, ProviderResult},
    provider::ChainDataProvider,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use tonsub_chain::{BlockHeader, BlockIdExt, Lt, MasterchainInfo, Seqno, ShardBlockKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MockCall {
    MasterchainInfo,
    MasterHeader,
    Shards,
    ShardHeader,
}

#[derive(Debug, Default)]
struct MockState {
    /// Upcoming tips, one consumed per masterchain info call
    tips: VecDeque<Seqno>,
    current_tip: Seqno,
    masters: HashMap<Seqno, (BlockHeader, Vec<BlockIdExt>)>,
    shards: HashMap<ShardBlockKey, BlockHeader>,
    /// Number of upcoming calls that fail, per call kind
    failures: HashMap<MockCall, usize>,
    calls: HashMap<MockCall, usize>,
}

impl MockState {
    fn enter(&mut self, call: MockCall) -> ProviderResult<()> {
        *self.calls.entry(call).or_default() += 1;
        match self.failures.get_mut(&call) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Err(ProviderError::Unavailable(format!("injected {call:?} failure")))
            }
            _ => Ok(()),
        }
    }
}

/// A scripted in-memory chain.
///
/// The tip advances through a scripted sequence, one step per masterchain info call,
/// and stays at the last scripted value once the sequence is exhausted.
#[derive(Debug, Default)]
pub struct MockProvider {
    state: Mutex<MockState>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tips(tips: impl IntoIterator<Item = Seqno>) -> Self {
        let provider = Self::new();
        provider.push_tips(tips);
        provider
    }

    pub fn push_tips(&self, tips: impl IntoIterator<Item = Seqno>) {
        self.state.lock().tips.extend(tips);
    }

    /// Registers a masterchain block along with the shard blocks it references
    pub fn add_master_block(&self, seqno: Seqno, end_lt: Lt, shards: Vec<BlockIdExt>) {
        let header = BlockHeader::new(BlockIdExt::masterchain(seqno), end_lt.saturating_sub(1), end_lt, vec![]);
        self.state.lock().masters.insert(seqno, (header, shards));
    }

    pub fn add_shard_block(&self, id: BlockIdExt, end_lt: Lt, prev_blocks: Vec<BlockIdExt>) {
        let key = ShardBlockKey::from(&id);
        let header = BlockHeader::new(id, end_lt.saturating_sub(1), end_lt, prev_blocks);
        self.state.lock().shards.insert(key, header);
    }

    /// Makes the next `count` calls of kind `call` fail with a transient error
    pub fn fail_next(&self, call: MockCall, count: usize) {
        *self.state.lock().failures.entry(call).or_default() += count;
    }

    pub fn call_count(&self, call: MockCall) -> usize {
        self.state.lock().calls.get(&call).copied().unwrap_or_default()
    }
}

#[async_trait]
impl ChainDataProvider for MockProvider {
    async fn get_masterchain_info(&self) -> ProviderResult<MasterchainInfo> {
        let mut state = self.state.lock();
        state.enter(MockCall::MasterchainInfo)?;
        if let Some(tip) = state.tips.pop_front() {
            state.current_tip = tip;
        }
        Ok(MasterchainInfo {
            last: BlockIdExt::masterchain(state.current_tip),
            state_root_hash: String::new(),
            init: BlockIdExt::masterchain(0),
        })
    }

    async fn get_master_header(&self, seqno: Seqno) -> ProviderResult<BlockHeader> {
        let mut state = self.state.lock();
        state.enter(MockCall::MasterHeader)?;
        state.masters.get(&seqno).map(|(header, _)| header.clone()).ok_or_else(|| ProviderError::NotFound(format!("masterchain block {seqno}")))
    }

    async fn get_shards(&self, seqno: Seqno) -> ProviderResult<Vec<BlockIdExt>> {
        let mut state = self.state.lock();
        state.enter(MockCall::Shards)?;
        state.masters.get(&seqno).map(|(_, shards)| shards.clone()).ok_or_else(|| ProviderError::NotFound(format!("masterchain block {seqno}")))
    }

    async fn get_shard_header(&self, key: ShardBlockKey) -> ProviderResult<BlockHeader> {
        let mut state = self.state.lock();
        state.enter(MockCall::ShardHeader)?;
        state.shards.get(&key).cloned().ok_or_else(|| ProviderError::NotFound(format!("shard block {key}")))
    }
}
