use crate::{
    context::WalkerContext,
    error::SubscriberResult,
    tick::{TickOutcome, report_tick_error},
};
use std::{sync::Arc, time::Duration};
use tonsub_chain::ShardBlockKey;
use tonsub_core::{
    debug, info,
    task::tick::TickReason,
    time::Stopwatch,
    trace,
};
use tonsub_notify::notification::ShardBlockNotification;

const WALKER: &str = "shardchain";

/// Drains the shard block frontier, one pending block per tick.
///
/// A processed block enqueues its predecessors so the walk proceeds backwards through the shard
/// DAG until it reaches blocks ending before the session start, which are pruned without expansion.
pub struct ShardchainWalker {
    ctx: Arc<WalkerContext>,
    interval: Duration,
}

impl ShardchainWalker {
    pub fn new(ctx: Arc<WalkerContext>, interval: Duration) -> Self {
        Self { ctx, interval }
    }

    pub async fn tick(&self) -> SubscriberResult<TickOutcome> {
        let ctx = &self.ctx;
        let Some(key) = ctx.store.next_pending_shard_block().await? else {
            return Ok(TickOutcome::Idle);
        };
        info!("shardchain tick - workchain: {} / shard: {} / seqno: {}", key.workchain, key.shard, key.seqno);

        let header = ctx.provider.get_shard_header(key).await?;
        if header.end_lt < ctx.cursor.start_lt {
            ctx.store.mark_shard_block_processed(key, &[]).await?;
            return Ok(TickOutcome::ShardPruned(key));
        }

        let ancestors = header.prev_blocks.iter().map(ShardBlockKey::from).collect::<Vec<_>>();
        ctx.store.mark_shard_block_processed(key, &ancestors).await?;
        ctx.notifier.notify(ShardBlockNotification { header: Arc::new(header) }.into());
        Ok(TickOutcome::ShardProcessed(key))
    }

    pub async fn worker(self) {
        debug!("{WALKER} walker starting at lt {}", self.ctx.cursor.start_lt);
        loop {
            if self.ctx.tick_service.is_shutdown() {
                break;
            }
            let outcome = {
                let _sw = Stopwatch::<10_000>::with_threshold("shardchain tick");
                self.tick().await
            };
            match outcome {
                Ok(outcome) => trace!("{WALKER} tick: {outcome:?}"),
                Err(err) => report_tick_error(WALKER, &err),
            }
            if let TickReason::Shutdown = self.ctx.tick_service.tick(self.interval).await {
                break;
            }
        }
        debug!("{WALKER} walker exiting");
    }
}
