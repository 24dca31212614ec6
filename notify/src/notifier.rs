use crate::{
    error::{Error, Result},
    listener::{DynListener, ListenerId},
    notification::Notification,
};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::{
    fmt::Debug,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tonsub_core::{trace, warn};

/// Publish point of the walkers
pub trait Notify: Send + Sync + Debug {
    fn notify(&self, notification: Notification);
}

pub type DynNotify = Arc<dyn Notify>;

/// Delivers every published [`Notification`] to all registered listeners.
///
/// Delivery is synchronous: `notify` returns once every listener was called, in registration order.
/// Each listener call is isolated so that neither an error nor a panic of a listener reaches the
/// publisher or prevents the delivery to the remaining listeners.
#[derive(Debug)]
pub struct Notifier {
    /// Name of the notifier, used in logs
    name: &'static str,

    /// Map of registered listeners
    listeners: RwLock<IndexMap<ListenerId, DynListener>>,

    next_listener_id: AtomicU64,
}

impl Notifier {
    pub fn new(name: &'static str) -> Self {
        Self { name, listeners: RwLock::new(IndexMap::new()), next_listener_id: AtomicU64::new(1) }
    }

    pub fn register_new_listener(&self, listener: DynListener) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        trace!("[Notifier {}] registering listener {id}", self.name);
        self.listeners.write().insert(id, listener);
        id
    }

    pub fn unregister_listener(&self, id: ListenerId) -> Result<()> {
        match self.listeners.write().shift_remove(&id) {
            Some(listener) => {
                trace!("[Notifier {}] closing listener {id}", self.name);
                listener.close();
                Ok(())
            }
            None => Err(Error::UnknownListener(id)),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Unregisters and closes all listeners
    pub fn close(&self) {
        let listeners = std::mem::take(&mut *self.listeners.write());
        listeners.values().for_each(|x| x.close());
    }

    fn deliver(&self, id: ListenerId, listener: &DynListener, notification: &Notification) -> Result<()> {
        match catch_unwind(AssertUnwindSafe(|| listener.notify(notification))) {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| format!("listener {id}"));
                Err(Error::ListenerPanic(message))
            }
        }
    }
}

impl Notify for Notifier {
    fn notify(&self, notification: Notification) {
        // Listeners are snapshotted so a listener may (un)register others without deadlocking
        let listeners = self.listeners.read().iter().map(|(id, x)| (*id, x.clone())).collect::<Vec<_>>();
        for (id, listener) in listeners {
            if let Err(err) = self.deliver(id, &listener, &notification) {
                warn!("[Notifier {}] listener {id} failed on {notification}: {err}", self.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        listener::{ChannelListener, FnListener},
        notification::{MasterBlockNotification, ShardBlockNotification},
    };
    use std::sync::Mutex;
    use tonsub_chain::{BlockHeader, BlockIdExt};

    fn master(seqno: u32) -> Notification {
        let header = BlockHeader::new(BlockIdExt::masterchain(seqno), 0, seqno as u64, vec![]);
        MasterBlockNotification { header: Arc::new(header), shards: Arc::new(vec![]) }.into()
    }

    fn shard(seqno: u32) -> Notification {
        let header = BlockHeader::new(BlockIdExt::new(0, 1, seqno), 0, seqno as u64, vec![]);
        ShardBlockNotification { header: Arc::new(header) }.into()
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let notifier = Notifier::new("test");
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b"] {
            let log = log.clone();
            notifier.register_new_listener(Arc::new(FnListener::new(move |n: &Notification| {
                log.lock().unwrap().push(format!("{tag}{}", n.id().seqno));
                Ok(())
            })));
        }
        notifier.notify(master(1));
        notifier.notify(shard(2));
        assert_eq!(*log.lock().unwrap(), vec!["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn test_failing_listeners_are_isolated() {
        let notifier = Notifier::new("test");
        notifier.register_new_listener(Arc::new(FnListener::new(|_: &Notification| Err(Error::General("boom".to_string())))));
        notifier.register_new_listener(Arc::new(FnListener::new(|_: &Notification| panic!("listener panic"))));
        let (listener, receiver) = ChannelListener::unbounded();
        notifier.register_new_listener(Arc::new(listener));

        notifier.notify(master(7));
        notifier.notify(master(8));

        assert_eq!(receiver.try_recv().unwrap().id().seqno, 7);
        assert_eq!(receiver.try_recv().unwrap().id().seqno, 8);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_unregister_closes_listener() {
        let notifier = Notifier::new("test");
        let (listener, receiver) = ChannelListener::unbounded();
        let id = notifier.register_new_listener(Arc::new(listener));
        assert_eq!(notifier.listener_count(), 1);

        notifier.unregister_listener(id).unwrap();
        assert_eq!(notifier.listener_count(), 0);
        assert!(receiver.is_closed());
        assert!(matches!(notifier.unregister_listener(id), Err(Error::UnknownListener(x)) if x == id));

        // Publishing without listeners is a no-op
        notifier.notify(shard(1));
    }

    #[tokio::test]
    async fn test_channel_listener_consumer_task() {
        let notifier = Notifier::new("test");
        let (listener, receiver) = ChannelListener::unbounded();
        notifier.register_new_listener(Arc::new(listener));
        let consumer = tokio::spawn(async move {
            let mut seqnos = vec![];
            while let Ok(notification) = receiver.recv().await {
                seqnos.push(notification.id().seqno);
            }
            seqnos
        });
        (1..=3).for_each(|i| notifier.notify(master(i)));
        notifier.close();
        assert_eq!(consumer.await.unwrap(), vec![1, 2, 3]);
    }
}
