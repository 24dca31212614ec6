use crate::{error::Result, notification::Notification};
use async_channel::{Receiver, Sender};
use std::{fmt::Debug, sync::Arc};

pub type ListenerId = u64;

/// A consumer of [`Notification`]s registered into a [`crate::notifier::Notifier`].
///
/// `notify` is called synchronously by the publishing walker and must not block.
pub trait Listener: Send + Sync + Debug {
    fn notify(&self, notification: &Notification) -> Result<()>;

    fn close(&self) {}
}

pub type DynListener = Arc<dyn Listener>;

/// Relays notifications into an unbounded channel drained by the consumer on its own task
#[derive(Clone, Debug)]
pub struct ChannelListener {
    sender: Sender<Notification>,
}

impl ChannelListener {
    pub fn new(sender: Sender<Notification>) -> Self {
        Self { sender }
    }

    /// Creates a listener along with the receiving end of its channel
    pub fn unbounded() -> (Self, Receiver<Notification>) {
        let (sender, receiver) = async_channel::unbounded();
        (Self::new(sender), receiver)
    }
}

impl Listener for ChannelListener {
    fn notify(&self, notification: &Notification) -> Result<()> {
        Ok(self.sender.try_send(notification.clone())?)
    }

    fn close(&self) {
        self.sender.close();
    }
}

/// Calls a closure for every notification
pub struct FnListener<F>
where
    F: Fn(&Notification) -> Result<()> + Send + Sync,
{
    callback: F,
}

impl<F> FnListener<F>
where
    F: Fn(&Notification) -> Result<()> + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Debug for FnListener<F>
where
    F: Fn(&Notification) -> Result<()> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnListener").finish_non_exhaustive()
    }
}

impl<F> Listener for FnListener<F>
where
    F: Fn(&Notification) -> Result<()> + Send + Sync,
{
    fn notify(&self, notification: &Notification) -> Result<()> {
        (self.callback)(notification)
    }
}
