use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("malformed shard block key '{0}'")]
    MalformedShardBlockKey(String),
}

pub type ChainResult<T> = std::result::Result<T, ChainError>;
