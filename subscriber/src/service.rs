use crate::subscriber::Subscriber;
use std::sync::Arc;
use tonsub_core::{
    task::service::{AsyncService, AsyncServiceError, AsyncServiceFuture},
    trace,
};

const SUBSCRIBER: &str = "block-subscriber";

/// Runs a [`Subscriber`] as an [`AsyncService`]
pub struct SubscriberService {
    subscriber: Arc<Subscriber>,
}

impl SubscriberService {
    pub fn new(subscriber: Arc<Subscriber>) -> Self {
        Self { subscriber }
    }

    pub fn subscriber(&self) -> Arc<Subscriber> {
        self.subscriber.clone()
    }
}

impl AsyncService for SubscriberService {
    fn ident(self: Arc<Self>) -> &'static str {
        SUBSCRIBER
    }

    fn start(self: Arc<Self>) -> AsyncServiceFuture {
        trace!("{} starting", SUBSCRIBER);
        Box::pin(async move {
            self.subscriber.start().await.map_err(|err| AsyncServiceError::Service(err.to_string()))?;
            self.subscriber.join().await.map_err(|err| AsyncServiceError::Service(err.to_string()))?;
            trace!("{} exiting", SUBSCRIBER);
            Ok(())
        })
    }

    fn signal_exit(self: Arc<Self>) {
        trace!("sending an exit signal to {}", SUBSCRIBER);
        self.subscriber.stop();
    }

    fn stop(self: Arc<Self>) -> AsyncServiceFuture {
        trace!("{} stopping", SUBSCRIBER);
        Box::pin(async move {
            self.subscriber.join().await.map_err(|err| AsyncServiceError::Service(err.to_string()))?;
            trace!("{} stopped", SUBSCRIBER);
            Ok(())
        })
    }
}
