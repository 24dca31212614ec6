pub mod config;
pub mod context;
pub mod cursor;
pub mod error;
pub mod masterchain;
pub mod service;
pub mod shardchain;
pub mod subscriber;
pub mod tick;

pub use config::Config;
pub use context::WalkerContext;
pub use cursor::SessionCursor;
pub use error::{ErrorKind, SubscriberError, SubscriberResult};
pub use masterchain::MasterchainWalker;
pub use service::SubscriberService;
pub use shardchain::ShardchainWalker;
pub use subscriber::Subscriber;
pub use tick::TickOutcome;
