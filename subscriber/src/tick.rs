use crate::error::SubscriberError;
use tonsub_chain::{Seqno, ShardBlockKey};
use tonsub_core::error;

/// What a successful walker tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do
    Idle,

    /// Masterchain heights `from..=to` were processed and announced
    Advanced { from: Seqno, to: Seqno },

    /// A shard block was processed and announced
    ShardProcessed(ShardBlockKey),

    /// A shard block older than the session start was processed silently
    ShardPruned(ShardBlockKey),
}

pub(crate) fn report_tick_error(walker: &str, err: &SubscriberError) {
    error!("{walker} tick error ({}): {err}", err.kind());
}
