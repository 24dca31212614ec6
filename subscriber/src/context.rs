use crate::cursor::SessionCursor;
use tonsub_core::task::tick::TickService;
use tonsub_notify::notifier::DynNotify;
use tonsub_provider::DynChainDataProvider;
use tonsub_store::DynFrontierStore;

/// State of a subscription run, shared by both walkers
#[derive(Debug, Clone)]
pub struct WalkerContext {
    pub provider: DynChainDataProvider,
    pub store: DynFrontierStore,
    pub notifier: DynNotify,
    pub cursor: SessionCursor,
    /// Paces the walkers and carries the stop signal of the run
    pub tick_service: TickService,
}

impl WalkerContext {
    pub fn new(
        provider: DynChainDataProvider,
        store: DynFrontierStore,
        notifier: DynNotify,
        cursor: SessionCursor,
        tick_service: TickService,
    ) -> Self {
        Self { provider, store, notifier, cursor, tick_service }
    }
}
