//! Engine tuning configuration.
//!
//! Loaded as the `engine` section of `.taskdeps/config.yaml`; see
//! [`crate::commands::init::TaskdepsConfig`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upper bound on nodes expanded by one cycle search
pub const DEFAULT_MAX_TRAVERSAL: usize = 10_000;

/// Default deadline for a single engine operation, in milliseconds
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;

/// Settings for the dependency engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Nodes a cycle search may expand before it gives up and reports a cycle
    pub max_traversal: usize,

    /// Deadline for each engine operation, including waiting for the write lock
    pub operation_timeout_ms: u64,
}

impl EngineConfig {
    /// Deadline for each engine operation
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Reject settings that would make every operation fail.
    pub fn validate(&self) -> Result<()> {
        if self.max_traversal == 0 {
            return Err(Error::Config(
                "engine.max_traversal must be at least 1".to_string(),
            ));
        }
        if self.operation_timeout_ms == 0 {
            return Err(Error::Config(
                "engine.operation_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_traversal: DEFAULT_MAX_TRAVERSAL,
            operation_timeout_ms: DEFAULT_OPERATION_TIMEOUT_MS,
        }
    }
}
