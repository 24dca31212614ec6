use futures_util::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AsyncServiceError {
    #[error("{0}")]
    Service(String),
}

pub type AsyncServiceResult<T> = std::result::Result<T, AsyncServiceError>;

pub type AsyncServiceFuture = BoxFuture<'static, AsyncServiceResult<()>>;

/// A long running asynchronous service.
///
/// `start` returns a future living as long as the service runs, `signal_exit` asks it
/// to wind down and `stop` completes once the service has released its resources.
pub trait AsyncService: Send + Sync {
    fn ident(self: Arc<Self>) -> &'static str;
    fn start(self: Arc<Self>) -> AsyncServiceFuture;
    fn signal_exit(self: Arc<Self>);
    fn stop(self: Arc<Self>) -> AsyncServiceFuture;
}
