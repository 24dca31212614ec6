pub mod block;
pub mod errors;
pub mod key;

pub use block::{BlockHeader, BlockIdExt, BlockShards, MasterchainInfo};
pub use errors::{ChainError, ChainResult};
pub use key::ShardBlockKey;

/// Workchain id of the masterchain
pub const MASTERCHAIN_WORKCHAIN: i32 = -1;

/// Shard id of the masterchain, i.e. the full shard prefix `0x8000000000000000`
pub const MASTERCHAIN_SHARD: i64 = i64::MIN;

/// Sequence number of a block within its chain
pub type Seqno = u32;

/// Logical time
pub type Lt = u64;
