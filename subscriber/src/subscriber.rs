use crate::{
    config::Config,
    context::WalkerContext,
    cursor::SessionCursor,
    error::{SubscriberError, SubscriberResult},
    masterchain::MasterchainWalker,
    shardchain::ShardchainWalker,
};
use futures_util::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::AbortHandle;
use tonsub_core::{info, task::tick::TickService, warn};
use tonsub_notify::{
    listener::{DynListener, ListenerId},
    notifier::Notifier,
};
use tonsub_provider::DynChainDataProvider;
use tonsub_store::DynFrontierStore;

/// Completion of a walker task, awaitable by any number of joiners
type WalkerHandle = Shared<BoxFuture<'static, Result<(), String>>>;

struct Run {
    cursor: SessionCursor,
    tick_service: TickService,
    walkers: Vec<WalkerHandle>,
    /// Liveness of the walkers, independent of whether anyone joins them
    tasks: Vec<AbortHandle>,
}

impl Run {
    fn is_live(&self) -> bool {
        self.tasks.iter().any(|x| !x.is_finished())
    }
}

enum RunState {
    Idle,
    /// Resolving the cursor. The tick service records a stop requested meanwhile.
    Starting(TickService),
    Running(Run),
}

/// Lifecycle controller of a block subscription.
///
/// Resolves the session cursor, runs the masterchain and shardchain walkers as two
/// independent tasks and publishes their blocks through its notifier.
pub struct Subscriber {
    config: Config,
    provider: DynChainDataProvider,
    store: DynFrontierStore,
    notifier: Arc<Notifier>,
    state: Mutex<RunState>,
}

impl Subscriber {
    pub fn new(config: Config, provider: DynChainDataProvider, store: DynFrontierStore) -> Self {
        Self { config, provider, store, notifier: Arc::new(Notifier::new("subscriber")), state: Mutex::new(RunState::Idle) }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn notifier(&self) -> Arc<Notifier> {
        self.notifier.clone()
    }

    pub fn register_listener(&self, listener: DynListener) -> ListenerId {
        self.notifier.register_new_listener(listener)
    }

    /// Cursor of the current or last run
    pub fn cursor(&self) -> Option<SessionCursor> {
        match &*self.state.lock() {
            RunState::Running(run) => Some(run.cursor),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        match &*self.state.lock() {
            RunState::Starting(_) => true,
            RunState::Running(run) => run.is_live(),
            RunState::Idle => false,
        }
    }

    /// Resolves the session cursor and launches the walkers.
    ///
    /// Must be called within a tokio runtime. Fails with `AlreadyRunning` while walkers of a
    /// previous run are still live.
    pub async fn start(&self) -> SubscriberResult<SessionCursor> {
        let tick_service = TickService::new();
        {
            let mut state = self.state.lock();
            match &*state {
                RunState::Starting(_) => return Err(SubscriberError::AlreadyRunning),
                RunState::Running(run) if run.is_live() => return Err(SubscriberError::AlreadyRunning),
                _ => *state = RunState::Starting(tick_service.clone()),
            }
        }
        info!("start subscriber");

        let cursor = match SessionCursor::resolve(self.provider.as_ref(), self.config.start_height).await {
            Ok(cursor) => cursor,
            Err(err) => {
                *self.state.lock() = RunState::Idle;
                return Err(err);
            }
        };

        let mut state = self.state.lock();
        if tick_service.is_shutdown() {
            info!("subscriber stopped while starting");
            *state = RunState::Running(Run { cursor, tick_service, walkers: vec![], tasks: vec![] });
            return Ok(cursor);
        }
        let ctx = Arc::new(WalkerContext::new(
            self.provider.clone(),
            self.store.clone(),
            self.notifier.clone(),
            cursor,
            tick_service.clone(),
        ));
        let mut handles = vec![tokio::spawn(MasterchainWalker::new(ctx.clone(), self.config.masterchain_poll_interval()).worker())];
        if self.config.shardchain_enabled {
            handles.push(tokio::spawn(ShardchainWalker::new(ctx, self.config.shardchain_poll_interval()).worker()));
        }
        let tasks = handles.iter().map(|x| x.abort_handle()).collect();
        let walkers = handles.into_iter().map(|x| x.map(|result| result.map_err(|err| err.to_string())).boxed().shared()).collect();
        *state = RunState::Running(Run { cursor, tick_service, walkers, tasks });
        Ok(cursor)
    }

    /// Signals the walkers to exit. An in-flight tick runs to completion.
    ///
    /// A stop requested while the cursor is being resolved makes `start` return without spawning the walkers.
    pub fn stop(&self) {
        match &*self.state.lock() {
            RunState::Starting(tick_service) => tick_service.shutdown(),
            RunState::Running(run) => run.tick_service.shutdown(),
            RunState::Idle => return,
        }
        info!("stop subscriber");
    }

    /// Waits for the walkers of the current run to exit. Expected to follow [`Self::stop`].
    ///
    /// May be awaited by several callers at once.
    pub async fn join(&self) -> SubscriberResult<()> {
        let walkers = match &*self.state.lock() {
            RunState::Running(run) => run.walkers.clone(),
            _ => vec![],
        };
        for walker in walkers {
            walker.await.map_err(SubscriberError::Join)?;
        }
        Ok(())
    }

    /// Clears the frontier store
    pub async fn clean(&self) -> SubscriberResult<()> {
        if self.is_running() {
            warn!("cleaning the storage of a running subscriber");
        }
        self.store.reset().await?;
        info!("clean storage");
        Ok(())
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        match self.state.get_mut() {
            RunState::Starting(tick_service) => tick_service.shutdown(),
            RunState::Running(run) => run.tick_service.shutdown(),
            RunState::Idle => {}
        }
    }
}
