use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("data inconsistency: {0}")]
    DataInconsistency(String),

    #[error("rocksdb error {0}")]
    DbError(#[from] rocksdb::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

