use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("error received: {0}")]
    Rejected(String),

    #[error("broken response received: {0}")]
    BrokenResponse(String),

    #[error("invalid last masterchain block from provider")]
    InvalidTip,

    #[error("{0} not found")]
    NotFound(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
