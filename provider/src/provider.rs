use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tonsub_chain::{BlockHeader, BlockIdExt, MasterchainInfo, Seqno, ShardBlockKey};

/// Read access to the chain.
///
/// All calls are free of side effects on the remote system and are safe to retry.
#[async_trait]
pub trait ChainDataProvider: Send + Sync + Debug {
    async fn get_masterchain_info(&self) -> ProviderResult<MasterchainInfo>;

    /// Height of the latest masterchain block
    async fn get_tip(&self) -> ProviderResult<Seqno> {
        match self.get_masterchain_info().await?.last.seqno {
            0 => Err(ProviderError::InvalidTip),
            seqno => Ok(seqno),
        }
    }

    async fn get_master_header(&self, seqno: Seqno) -> ProviderResult<BlockHeader>;

    /// Shard blocks referenced by the masterchain block at `seqno`
    async fn get_shards(&self, seqno: Seqno) -> ProviderResult<Vec<BlockIdExt>>;

    async fn get_shard_header(&self, key: ShardBlockKey) -> ProviderResult<BlockHeader>;
}

pub type DynChainDataProvider = Arc<dyn ChainDataProvider>;
