pub mod error;
pub mod jsonrpc;
pub mod mock;
pub mod provider;

pub use error::{ProviderError, ProviderResult};
pub use jsonrpc::{JsonRpcConfig, JsonRpcProvider};
pub use provider::{ChainDataProvider, DynChainDataProvider};
