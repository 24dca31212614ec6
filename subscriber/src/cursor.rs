use crate::error::SubscriberResult;
use tonsub_chain::{Lt, Seqno};
use tonsub_core::info;
use tonsub_provider::ChainDataProvider;

/// Starting point of a subscription session.
///
/// Masterchain heights above `start_seqno` are announced. Shard blocks ending before
/// `start_lt` predate the session and are pruned without being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCursor {
    pub start_seqno: Seqno,
    pub start_lt: Lt,
}

impl SessionCursor {
    pub fn new(start_seqno: Seqno, start_lt: Lt) -> Self {
        Self { start_seqno, start_lt }
    }

    /// Resolves the cursor from an explicit start height, or from the live tip when absent
    pub async fn resolve(provider: &dyn ChainDataProvider, start_height: Option<Seqno>) -> SubscriberResult<Self> {
        let start_seqno = match start_height {
            Some(start_height) => start_height,
            None => provider.get_tip().await?,
        };
        let header = provider.get_master_header(start_seqno).await?;
        let cursor = Self::new(start_seqno, header.end_lt);
        info!("Session starts after masterchain block {} (lt {})", cursor.start_seqno, cursor.start_lt);
        Ok(cursor)
    }
}
