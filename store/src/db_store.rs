use crate::{
    error::{StoreError, StoreResult},
    store::{FrontierStore, shardchain_keys},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{collections::HashSet, fmt::Debug, path::PathBuf, sync::Arc};
use tonsub_chain::{Seqno, ShardBlockKey};
use tonsub_database::{
    prelude::{BatchDbWriter, ConnBuilder, DB, DbAccess, DbKey, DirectDbWriter, WriteBatch},
    registry::DatabaseStorePrefixes,
};

const PENDING: u8 = 0;
const PROCESSED: u8 = 1;

const SHARD_KEY_LEN: usize = 16;

fn height_key(seqno: Seqno) -> DbKey {
    DbKey::new(DatabaseStorePrefixes::MasterchainHeights.as_ref(), seqno.to_be_bytes())
}

fn encode_shard_key(key: &ShardBlockKey) -> [u8; SHARD_KEY_LEN] {
    let mut bytes = [0u8; SHARD_KEY_LEN];
    bytes[..4].copy_from_slice(&key.workchain.to_be_bytes());
    bytes[4..12].copy_from_slice(&key.shard.to_be_bytes());
    bytes[12..].copy_from_slice(&key.seqno.to_be_bytes());
    bytes
}

fn decode_shard_key(bytes: &[u8]) -> StoreResult<ShardBlockKey> {
    let bytes: [u8; SHARD_KEY_LEN] =
        bytes.try_into().map_err(|_| StoreError::MalformedRecord(format!("shard block key of {} bytes", bytes.len())))?;
    let (workchain, rest) = bytes.split_at(4);
    let (shard, seqno) = rest.split_at(8);
    // Lengths are fixed by the split points above
    Ok(ShardBlockKey::new(
        i32::from_be_bytes(workchain.try_into().unwrap_or_default()),
        i64::from_be_bytes(shard.try_into().unwrap_or_default()),
        u32::from_be_bytes(seqno.try_into().unwrap_or_default()),
    ))
}

fn decode_height(bytes: &[u8]) -> StoreResult<Seqno> {
    let bytes: [u8; 4] = bytes.try_into().map_err(|_| StoreError::MalformedRecord(format!("masterchain height of {} bytes", bytes.len())))?;
    Ok(Seqno::from_be_bytes(bytes))
}

fn block_key(key: &ShardBlockKey) -> DbKey {
    DbKey::new(DatabaseStorePrefixes::ShardchainBlocks.as_ref(), encode_shard_key(key))
}

fn pending_key(key: &ShardBlockKey) -> DbKey {
    DbKey::new(DatabaseStorePrefixes::ShardchainPending.as_ref(), encode_shard_key(key))
}

/// Synchronous RocksDB side of [`DbFrontierStore`], run on the blocking pool
struct DbFrontier {
    db: Arc<DB>,
    /// Serializes the read-modify-write operations
    write_lock: Mutex<()>,
}

impl DbFrontier {
    fn last_processed_master_height(&self) -> StoreResult<Option<Seqno>> {
        self.db.last(DatabaseStorePrefixes::MasterchainHeights.as_ref())?.map(|(key, _)| decode_height(&key)).transpose()
    }

    fn record_master_height(&self, seqno: Seqno) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        let key = height_key(seqno);
        if self.db.has(&key)? {
            return Err(StoreError::DuplicateHeight(seqno));
        }
        self.db.write(&mut DirectDbWriter::new(&self.db), key, [PROCESSED])?;
        Ok(())
    }

    fn seed_shard_blocks(&self, keys: &[ShardBlockKey]) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        let mut batch = WriteBatch::default();
        self.seed_into(&mut batch, keys)?;
        self.commit(batch)
    }

    fn next_pending_shard_block(&self) -> StoreResult<Option<ShardBlockKey>> {
        self.db.first(DatabaseStorePrefixes::ShardchainPending.as_ref())?.map(|(key, _)| decode_shard_key(&key)).transpose()
    }

    fn mark_shard_block_processed(&self, key: ShardBlockKey, ancestors: &[ShardBlockKey]) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        if !self.db.has(&block_key(&key))? {
            return Err(StoreError::UnknownShardBlock(key));
        }
        let mut batch = WriteBatch::default();
        {
            let mut writer = BatchDbWriter::new(&mut batch);
            self.db.write(&mut writer, block_key(&key), [PROCESSED])?;
            self.db.delete(&mut writer, pending_key(&key))?;
        }
        // The key itself is known, so seeding it again among the ancestors is a no-op
        self.seed_into(&mut batch, ancestors)?;
        self.commit(batch)
    }

    fn reset(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        let mut batch = WriteBatch::default();
        let mut writer = BatchDbWriter::new(&mut batch);
        for prefix in [DatabaseStorePrefixes::MasterchainHeights, DatabaseStorePrefixes::ShardchainBlocks, DatabaseStorePrefixes::ShardchainPending]
        {
            self.db.delete_range_by_prefix(&mut writer, prefix.as_ref())?;
        }
        self.commit(batch)
    }

    /// Adds the unknown keys as pending into `batch`
    fn seed_into(&self, batch: &mut WriteBatch, keys: &[ShardBlockKey]) -> StoreResult<()> {
        let mut writer = BatchDbWriter::new(batch);
        let mut seen = HashSet::new();
        for key in shardchain_keys(keys) {
            if !seen.insert(*key) || self.db.has(&block_key(key))? {
                continue;
            }
            self.db.write(&mut writer, block_key(key), [PENDING])?;
            self.db.write(&mut writer, pending_key(key), b"")?;
        }
        Ok(())
    }

    fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        DB::write(&self.db, batch).map_err(tonsub_database::prelude::StoreError::from)?;
        Ok(())
    }
}

/// Durable [`FrontierStore`] in a local RocksDB, for a single process.
///
/// Shard block states live under `ShardchainBlocks` and the frontier is indexed under `ShardchainPending`,
/// both updated through one write batch per operation. RocksDB calls run on the tokio blocking pool.
pub struct DbFrontierStore {
    inner: Arc<DbFrontier>,
}

impl DbFrontierStore {
    pub fn new(db: Arc<DB>) -> Self {
        Self { inner: Arc::new(DbFrontier { db, write_lock: Mutex::new(()) }) }
    }

    pub fn open(path: PathBuf) -> StoreResult<Self> {
        Ok(Self::new(ConnBuilder::new(path).build()?))
    }

    async fn blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&DbFrontier) -> StoreResult<T> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || op(&inner)).await.map_err(|err| StoreError::Blocking(err.to_string()))?
    }
}

impl Debug for DbFrontierStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbFrontierStore").field("path", &self.inner.db.path()).finish()
    }
}

#[async_trait]
impl FrontierStore for DbFrontierStore {
    async fn last_processed_master_height(&self) -> StoreResult<Option<Seqno>> {
        self.blocking(|db| db.last_processed_master_height()).await
    }

    async fn record_master_height(&self, seqno: Seqno) -> StoreResult<()> {
        self.blocking(move |db| db.record_master_height(seqno)).await
    }

    async fn seed_shard_blocks(&self, keys: &[ShardBlockKey]) -> StoreResult<()> {
        let keys = keys.to_vec();
        self.blocking(move |db| db.seed_shard_blocks(&keys)).await
    }

    async fn next_pending_shard_block(&self) -> StoreResult<Option<ShardBlockKey>> {
        self.blocking(|db| db.next_pending_shard_block()).await
    }

    async fn mark_shard_block_processed(&self, key: ShardBlockKey, ancestors: &[ShardBlockKey]) -> StoreResult<()> {
        let ancestors = ancestors.to_vec();
        self.blocking(move |db| db.mark_shard_block_processed(key, &ancestors)).await
    }

    async fn reset(&self) -> StoreResult<()> {
        self.blocking(|db| db.reset()).await
    }
}
