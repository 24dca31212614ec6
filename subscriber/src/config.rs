use crate::error::{SubscriberError, SubscriberResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tonsub_chain::Seqno;

pub const DEFAULT_MASTERCHAIN_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_SHARDCHAIN_POLL_INTERVAL_MS: u64 = 1_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Config {
    /// Masterchain height the session starts after. The live tip is used when absent.
    pub start_height: Option<Seqno>,

    pub masterchain_poll_interval_ms: u64,

    pub shardchain_poll_interval_ms: u64,

    /// Runs the shardchain walker. When disabled the frontier is still seeded but never drained.
    pub shardchain_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_height: None,
            masterchain_poll_interval_ms: DEFAULT_MASTERCHAIN_POLL_INTERVAL_MS,
            shardchain_poll_interval_ms: DEFAULT_SHARDCHAIN_POLL_INTERVAL_MS,
            shardchain_enabled: true,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> SubscriberResult<Self> {
        toml::from_str(s).map_err(|err| SubscriberError::Config(err.to_string()))
    }

    pub fn with_start_height(self, start_height: Seqno) -> Self {
        Self { start_height: Some(start_height), ..self }
    }

    pub fn with_poll_intervals(self, masterchain_ms: u64, shardchain_ms: u64) -> Self {
        Self { masterchain_poll_interval_ms: masterchain_ms, shardchain_poll_interval_ms: shardchain_ms, ..self }
    }

    pub fn with_shardchain_enabled(self, shardchain_enabled: bool) -> Self {
        Self { shardchain_enabled, ..self }
    }

    pub fn masterchain_poll_interval(&self) -> Duration {
        Duration::from_millis(self.masterchain_poll_interval_ms)
    }

    pub fn shardchain_poll_interval(&self) -> Duration {
        Duration::from_millis(self.shardchain_poll_interval_ms)
    }
}
