use crate::{
    db_store::DbFrontierStore,
    error::StoreResult,
    memory::MemoryFrontierStore,
    redis_store::{DEFAULT_NAMESPACE, RedisFrontierStore},
    store::DynFrontierStore,
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};
use tonsub_core::info;

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// Selects and configures the [`crate::FrontierStore`] backend
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum StoreConfig {
    /// Ephemeral, in-process
    #[default]
    Memory,

    /// Durable, shared between processes
    Redis {
        url: String,
        #[serde(default = "default_namespace")]
        namespace: String,
    },

    /// Durable, local to a single process
    Rocksdb { path: PathBuf },
}

impl StoreConfig {
    pub fn open(&self) -> StoreResult<DynFrontierStore> {
        info!("Opening {} frontier store", self.backend_name());
        Ok(match self {
            StoreConfig::Memory => Arc::new(MemoryFrontierStore::new()),
            StoreConfig::Redis { url, namespace } => Arc::new(RedisFrontierStore::open(url, namespace)?),
            StoreConfig::Rocksdb { path } => Arc::new(DbFrontierStore::open(path.clone())?),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::Redis { .. } => "redis",
            StoreConfig::Rocksdb { .. } => "rocksdb",
        }
    }
}
