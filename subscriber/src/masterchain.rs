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
use tonsub_notify::notification::MasterBlockNotification;

const WALKER: &str = "masterchain";

/// Walks the masterchain height by height, from the last processed height up to the live tip.
///
/// Every height is fetched, recorded, seeds the frontier with its shard blocks and is announced,
/// strictly in increasing order. A failing tick is retried from the same height.
pub struct MasterchainWalker {
    ctx: Arc<WalkerContext>,
    interval: Duration,
}

impl MasterchainWalker {
    pub fn new(ctx: Arc<WalkerContext>, interval: Duration) -> Self {
        Self { ctx, interval }
    }

    pub async fn tick(&self) -> SubscriberResult<TickOutcome> {
        let ctx = &self.ctx;
        let last_saved = ctx.store.last_processed_master_height().await?.unwrap_or(ctx.cursor.start_seqno);
        let tip = ctx.provider.get_tip().await?;
        if tip <= last_saved {
            return Ok(TickOutcome::Idle);
        }

        for seqno in last_saved + 1..=tip {
            info!("masterchain tick - seqno: {seqno}");
            let header = ctx.provider.get_master_header(seqno).await?;
            let shards = ctx.provider.get_shards(seqno).await?;

            ctx.store.record_master_height(seqno).await?;
            ctx.store.seed_shard_blocks(&shards.iter().map(ShardBlockKey::from).collect::<Vec<_>>()).await?;
            ctx.notifier.notify(MasterBlockNotification { header: Arc::new(header), shards: Arc::new(shards) }.into());
        }
        Ok(TickOutcome::Advanced { from: last_saved + 1, to: tip })
    }

    pub async fn worker(self) {
        debug!("{WALKER} walker starting after height {}", self.ctx.cursor.start_seqno);
        loop {
            if self.ctx.tick_service.is_shutdown() {
                break;
            }
            let outcome = {
                let _sw = Stopwatch::<10_000>::with_threshold("masterchain tick");
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
