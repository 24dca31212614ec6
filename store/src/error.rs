use thiserror::Error;
use tonsub_chain::{ChainError, Seqno, ShardBlockKey};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("masterchain block already exists! seqno: {0}")]
    DuplicateHeight(Seqno),

    #[error("shardchain block not found! workchain: {} / shard: {} / seqno: {}", .0.workchain, .0.shard, .0.seqno)]
    UnknownShardBlock(ShardBlockKey),

    #[error(transparent)]
    MalformedKey(#[from] ChainError),

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("database error: {0}")]
    Db(#[from] tonsub_database::prelude::StoreError),

    #[error("blocking database task failed: {0}")]
    Blocking(String),
}

impl StoreError {
    /// Errors reflecting a disagreement between the caller and the stored frontier,
    /// as opposed to a failing backend
    pub fn is_consistency(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateHeight(_) | StoreError::UnknownShardBlock(_) | StoreError::MalformedKey(_) | StoreError::MalformedRecord(_)
        )
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
