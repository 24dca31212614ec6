use async_channel::{SendError, TrySendError};
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("Error: {0}")]
    General(String),

    #[error("channel send error")]
    ChannelSendError,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("unknown listener {0}")]
    UnknownListener(u64),

    #[error("listener panicked: {0}")]
    ListenerPanic(String),
}

impl<T> From<SendError<T>> for Error {
    fn from(_: SendError<T>) -> Self {
        Error::ChannelSendError
    }
}

impl<T> From<TrySendError<T>> for Error {
    fn from(err: TrySendError<T>) -> Self {
        match err {
            TrySendError::Closed(_) => Error::ConnectionClosed,
            TrySendError::Full(_) => Error::ChannelSendError,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
