//! Worker pool configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Default worker pool size
pub const DEFAULT_WORKERS: usize = 100;

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Capacity of the job queue and the result channel (None = `workers`)
    #[serde(default)]
    pub queue_capacity: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: None,
        }
    }
}

impl PoolConfig {
    /// Pool of `workers` with the default queue capacity
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            queue_capacity: None,
        }
    }

    /// Effective channel capacity
    pub fn capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.workers)
    }

    /// Check the configuration before a pool is built from it
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.workers == 0 {
            return Err(ContractError::config_validation(
                "workers",
                "worker pool needs at least one worker",
            ));
        }
        if self.queue_capacity == Some(0) {
            return Err(ContractError::config_validation(
                "queue_capacity",
                "queue capacity must be at least 1",
            ));
        }
        Ok(())
    }
}
