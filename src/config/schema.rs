use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{MemoryError, Result};
use crate::memory::ActivityPolicy;

pub const DEFAULT_MAX_HISTORY: usize = 50;
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default)]
    pub activity_policy: ActivityPolicy,

    /// Interval for hosts that run the background sweeper
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            ttl_secs: DEFAULT_TTL_SECS,
            activity_policy: ActivityPolicy::default(),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl StoreConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Rejects values a store or sweeper cannot be built from
    pub fn validate(&self) -> Result<()> {
        if self.max_history == 0 {
            return Err(MemoryError::invalid_configuration(
                "max_history must be a positive integer",
            ));
        }
        if self.ttl_secs == 0 {
            return Err(MemoryError::invalid_configuration(
                "ttl_secs must be a positive number of seconds",
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(MemoryError::invalid_configuration(
                "sweep_interval_secs must be a positive number of seconds",
            ));
        }
        Ok(())
    }
}
