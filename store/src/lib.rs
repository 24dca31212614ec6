pub mod config;
pub mod db_store;
pub mod error;
pub mod memory;
pub mod redis_store;
pub mod store;

#[cfg(test)]
mod conformance;

pub use config::StoreConfig;
pub use db_store::DbFrontierStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryFrontierStore;
pub use redis_store::RedisFrontierStore;
pub use store::{DynFrontierStore, FrontierStore};
