use crate::{Lt, MASTERCHAIN_SHARD, MASTERCHAIN_WORKCHAIN, Seqno};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Full block identifier as reported by the data provider.
///
/// The shard is carried on the wire as a signed decimal string.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockIdExt {
    pub workchain: i32,
    #[serde_as(as = "DisplayFromStr")]
    pub shard: i64,
    pub seqno: Seqno,
    #[serde(default)]
    pub root_hash: String,
    #[serde(default)]
    pub file_hash: String,
}

impl BlockIdExt {
    pub fn new(workchain: i32, shard: i64, seqno: Seqno) -> Self {
        Self { workchain, shard, seqno, root_hash: String::new(), file_hash: String::new() }
    }

    pub fn masterchain(seqno: Seqno) -> Self {
        Self::new(MASTERCHAIN_WORKCHAIN, MASTERCHAIN_SHARD, seqno)
    }

    pub fn is_masterchain(&self) -> bool {
        self.workchain == MASTERCHAIN_WORKCHAIN
    }
}

/// Block header metadata
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub id: BlockIdExt,
    #[serde(default)]
    pub global_id: i32,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub after_merge: bool,
    #[serde(default)]
    pub after_split: bool,
    #[serde(default)]
    pub before_split: bool,
    #[serde(default)]
    pub want_merge: bool,
    #[serde(default)]
    pub want_split: bool,
    #[serde(default)]
    pub validator_list_hash_short: i64,
    #[serde(default)]
    pub catchain_seqno: u32,
    #[serde(default)]
    pub min_ref_mc_seqno: Seqno,
    #[serde(default)]
    pub is_key_block: bool,
    #[serde(default)]
    pub prev_key_block_seqno: Seqno,
    #[serde_as(as = "DisplayFromStr")]
    pub start_lt: Lt,
    #[serde_as(as = "DisplayFromStr")]
    pub end_lt: Lt,
    #[serde(default)]
    pub gen_utime: u64,
    #[serde(default)]
    pub vert_seqno: u32,
    /// Direct predecessors: one, or two right after a shard merge
    #[serde(default)]
    pub prev_blocks: Vec<BlockIdExt>,
}

impl BlockHeader {
    /// A header carrying only identity, logical time bounds and predecessors
    pub fn new(id: BlockIdExt, start_lt: Lt, end_lt: Lt, prev_blocks: Vec<BlockIdExt>) -> Self {
        Self {
            id,
            global_id: 0,
            version: 0,
            flags: 0,
            after_merge: prev_blocks.len() > 1,
            after_split: false,
            before_split: false,
            want_merge: false,
            want_split: false,
            validator_list_hash_short: 0,
            catchain_seqno: 0,
            min_ref_mc_seqno: 0,
            is_key_block: false,
            prev_key_block_seqno: 0,
            start_lt,
            end_lt,
            gen_utime: 0,
            vert_seqno: 0,
            prev_blocks,
        }
    }
}

/// Up-to-date masterchain state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterchainInfo {
    pub last: BlockIdExt,
    #[serde(default)]
    pub state_root_hash: String,
    pub init: BlockIdExt,
}

/// Shard blocks referenced by a masterchain block
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockShards {
    pub shards: Vec<BlockIdExt>,
}
