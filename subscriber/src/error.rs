use std::fmt::Display;
use thiserror::Error;
use tonsub_provider::ProviderError;
use tonsub_store::StoreError;

#[derive(Error, Debug)]
pub enum SubscriberError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("subscriber is already running")]
    AlreadyRunning,

    #[error("walker task failed: {0}")]
    Join(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Classification of the errors aborting a walker tick.
///
/// Both kinds are retried on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Provider or backend I/O failure
    Transient,
    /// The store disagrees with what the walker attempts, e.g. a duplicate height
    Consistency,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Transient => write!(f, "transient"),
            ErrorKind::Consistency => write!(f, "consistency"),
        }
    }
}

impl SubscriberError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubscriberError::Store(err) if err.is_consistency() => ErrorKind::Consistency,
            SubscriberError::AlreadyRunning | SubscriberError::Config(_) => ErrorKind::Consistency,
            _ => ErrorKind::Transient,
        }
    }
}

pub type SubscriberResult<T> = std::result::Result<T, SubscriberError>;
