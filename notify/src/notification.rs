use derive_more::From;
use std::{fmt::Display, sync::Arc};
use tonsub_chain::{BlockHeader, BlockIdExt, Seqno};

/// A newly observed masterchain block with the shard blocks it references
#[derive(Clone, Debug)]
pub struct MasterBlockNotification {
    pub header: Arc<BlockHeader>,
    pub shards: Arc<Vec<BlockIdExt>>,
}

impl MasterBlockNotification {
    pub fn seqno(&self) -> Seqno {
        self.header.id.seqno
    }
}

/// A newly observed shardchain block
#[derive(Clone, Debug)]
pub struct ShardBlockNotification {
    pub header: Arc<BlockHeader>,
}

#[derive(Clone, Debug, From)]
pub enum Notification {
    MasterBlock(MasterBlockNotification),
    ShardBlock(ShardBlockNotification),
}

impl Notification {
    pub fn header(&self) -> &BlockHeader {
        match self {
            Notification::MasterBlock(notification) => &notification.header,
            Notification::ShardBlock(notification) => &notification.header,
        }
    }

    pub fn id(&self) -> &BlockIdExt {
        &self.header().id
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::MasterBlock(notification) => {
                write!(f, "MasterBlock notification: seqno {}, {} shard blocks", notification.seqno(), notification.shards.len())
            }
            Notification::ShardBlock(notification) => {
                let id = &notification.header.id;
                write!(f, "ShardBlock notification: workchain {} / shard {} / seqno {}", id.workchain, id.shard, id.seqno)
            }
        }
    }
}
