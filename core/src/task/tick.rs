use crate::triggers::SingleTrigger;
use std::time::Duration;
use tokio::select;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReason {
    /// The sleep duration elapsed
    Wakeup,

    /// The service was signaled to shut down
    Shutdown,
}

/// Interruptible sleeps shared by the polling loops of a single run.
///
/// A new `TickService` must be created for every run since its shutdown trigger is one-shot.
#[derive(Debug, Clone, Default)]
pub struct TickService {
    shutdown: SingleTrigger,
}

impl TickService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `duration` has elapsed when the service is running.
    ///
    /// Returns immediately when the service is shut down.
    pub async fn tick(&self, duration: Duration) -> TickReason {
        if self.is_shutdown() {
            return TickReason::Shutdown;
        }
        let shutdown = self.shutdown.listener.clone();
        select! {
            biased;
            _ = shutdown => TickReason::Shutdown,
            _ = tokio::time::sleep(duration) => TickReason::Wakeup,
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.trigger.trigger();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_triggered()
    }
}
