use crate::{BlockIdExt, ChainError, MASTERCHAIN_WORKCHAIN, Seqno};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Identity of a shard block inside the frontier.
///
/// Its textual form is `workchain_shard_seqno` with the shard as a signed decimal,
/// which is also the field name used by the shared store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShardBlockKey {
    pub workchain: i32,
    pub shard: i64,
    pub seqno: Seqno,
}

impl ShardBlockKey {
    pub const fn new(workchain: i32, shard: i64, seqno: Seqno) -> Self {
        Self { workchain, shard, seqno }
    }

    /// Masterchain blocks are tracked by height only and never enter the frontier
    pub const fn is_masterchain(&self) -> bool {
        self.workchain == MASTERCHAIN_WORKCHAIN
    }
}

impl From<&BlockIdExt> for ShardBlockKey {
    fn from(id: &BlockIdExt) -> Self {
        Self { workchain: id.workchain, shard: id.shard, seqno: id.seqno }
    }
}

impl From<ShardBlockKey> for BlockIdExt {
    fn from(key: ShardBlockKey) -> Self {
        BlockIdExt::new(key.workchain, key.shard, key.seqno)
    }
}

impl Display for ShardBlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.workchain, self.shard, self.seqno)
    }
}

impl FromStr for ShardBlockKey {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ChainError::MalformedShardBlockKey(s.to_string());
        let mut parts = s.split('_');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(workchain), Some(shard), Some(seqno), None) => Ok(Self {
                workchain: workchain.parse().map_err(|_| malformed())?,
                shard: shard.parse().map_err(|_| malformed())?,
                seqno: seqno.parse().map_err(|_| malformed())?,
            }),
            _ => Err(malformed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MASTERCHAIN_SHARD;

    #[test]
    fn test_textual_form() {
        let key = ShardBlockKey::new(0, MASTERCHAIN_SHARD, 42);
        assert_eq!(key.to_string(), "0_-9223372036854775808_42");
        assert_eq!("0_-9223372036854775808_42".parse::<ShardBlockKey>().unwrap(), key);
    }

    #[test]
    fn test_malformed_keys() {
        for s in ["", "0_1", "0_1_2_3", "a_1_2", "0_1_-2", "0__2"] {
            assert_eq!(s.parse::<ShardBlockKey>(), Err(ChainError::MalformedShardBlockKey(s.to_string())), "{s}");
        }
    }

    #[test]
    fn test_masterchain_detection() {
        assert!(ShardBlockKey::from(&BlockIdExt::masterchain(7)).is_masterchain());
        assert!(!ShardBlockKey::new(0, 1, 7).is_masterchain());
    }
}
