use crate::{
    error::{StoreError, StoreResult},
    store::{FrontierStore, shardchain_keys},
};
use async_trait::async_trait;
use redis::{AsyncCommands, Script, aio::MultiplexedConnection};
use std::fmt::Debug;
use tokio::sync::OnceCell;
use tonsub_chain::{Seqno, ShardBlockKey};
use tonsub_core::debug;

pub const DEFAULT_NAMESPACE: &str = "ton:";

const PENDING: u8 = 0;
const PROCESSED: u8 = 1;

/// Flips `ARGV[1]` to `ARGV[2]` if it is known, seeding `ARGV[4..]` with `ARGV[3]`.
/// Returns 0 for an unknown block, leaving the hash untouched.
const MARK_PROCESSED_SCRIPT: &str = r"
if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 0 then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
for i = 4, #ARGV do
    redis.call('HSETNX', KEYS[1], ARGV[i], ARGV[3])
end
return 1
";

/// Names of the two hashes holding the frontier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisKeys {
    /// field = height, present once processed
    pub heights: String,
    /// field = `workchain_shard_seqno`, value = 0 (pending) or 1 (processed)
    pub blocks: String,
}

impl RedisKeys {
    pub fn new(namespace: &str) -> Self {
        Self { heights: format!("{namespace}masterchain-heights"), blocks: format!("{namespace}shardchain-blocks") }
    }
}

fn highest_height(fields: &[String]) -> StoreResult<Option<Seqno>> {
    fields.iter().try_fold(None, |max: Option<Seqno>, field| {
        let height = field.parse::<Seqno>().map_err(|_| StoreError::MalformedRecord(format!("masterchain height '{field}'")))?;
        Ok(Some(max.map_or(height, |max| max.max(height))))
    })
}

fn first_pending(entries: &[(String, u8)]) -> StoreResult<Option<ShardBlockKey>> {
    entries.iter().find(|(_, state)| *state == PENDING).map(|(field, _)| field.parse::<ShardBlockKey>().map_err(StoreError::from)).transpose()
}

/// Durable [`FrontierStore`] kept in two Redis hashes, shareable between processes.
///
/// Marking a shard block processed, including the check that it is known, and seeding its ancestors
/// run as one server-side script.
pub struct RedisFrontierStore {
    client: redis::Client,
    keys: RedisKeys,
    connection: OnceCell<MultiplexedConnection>,
    mark_processed: Script,
}

impl RedisFrontierStore {
    pub fn open(url: &str, namespace: &str) -> StoreResult<Self> {
        Ok(Self {
            client: redis::Client::open(url)?,
            keys: RedisKeys::new(namespace),
            connection: OnceCell::new(),
            mark_processed: Script::new(MARK_PROCESSED_SCRIPT),
        })
    }

    pub fn keys(&self) -> &RedisKeys {
        &self.keys
    }

    async fn connection(&self) -> StoreResult<MultiplexedConnection> {
        let connection = self
            .connection
            .get_or_try_init(|| async {
                debug!("[RedisFrontierStore] connecting to {}", self.keys.blocks);
                self.client.get_multiplexed_tokio_connection().await
            })
            .await?;
        Ok(connection.clone())
    }
}

impl Debug for RedisFrontierStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisFrontierStore").field("keys", &self.keys).finish_non_exhaustive()
    }
}

#[async_trait]
impl FrontierStore for RedisFrontierStore {
    async fn last_processed_master_height(&self) -> StoreResult<Option<Seqno>> {
        let mut conn = self.connection().await?;
        let fields: Vec<String> = conn.hkeys(&self.keys.heights).await?;
        highest_height(&fields)
    }

    async fn record_master_height(&self, seqno: Seqno) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let inserted: bool = conn.hset_nx(&self.keys.heights, seqno, PROCESSED).await?;
        match inserted {
            true => Ok(()),
            false => Err(StoreError::DuplicateHeight(seqno)),
        }
    }

    async fn seed_shard_blocks(&self, keys: &[ShardBlockKey]) -> StoreResult<()> {
        let fields = shardchain_keys(keys).map(|key| key.to_string()).collect::<Vec<_>>();
        if fields.is_empty() {
            return Ok(());
        }
        let mut pipe = redis::pipe();
        for field in fields {
            pipe.hset_nx(&self.keys.blocks, field, PENDING).ignore();
        }
        let mut conn = self.connection().await?;
        pipe.query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn next_pending_shard_block(&self) -> StoreResult<Option<ShardBlockKey>> {
        let mut conn = self.connection().await?;
        let entries: Vec<(String, u8)> = conn.hgetall(&self.keys.blocks).await?;
        first_pending(&entries)
    }

    async fn mark_shard_block_processed(&self, key: ShardBlockKey, ancestors: &[ShardBlockKey]) -> StoreResult<()> {
        let mut invocation = self.mark_processed.key(&self.keys.blocks);
        invocation.arg(key.to_string()).arg(PROCESSED).arg(PENDING);
        for ancestor in shardchain_keys(ancestors) {
            invocation.arg(ancestor.to_string());
        }
        let mut conn = self.connection().await?;
        let known: bool = invocation.invoke_async(&mut conn).await?;
        match known {
            true => Ok(()),
            false => Err(StoreError::UnknownShardBlock(key)),
        }
    }

    async fn reset(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        redis::pipe().atomic().del(&self.keys.heights).ignore().del(&self.keys.blocks).ignore().query_async::<()>(&mut conn).await?;
        Ok(())
    }
}
