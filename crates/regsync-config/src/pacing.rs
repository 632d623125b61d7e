//! Waits, pauses and polling bounds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_settle_ms() -> u64 {
    2000
}

const fn default_transfer_pause_ms() -> u64 {
    2000
}

const fn default_poll_attempts() -> u32 {
    8
}

const fn default_poll_initial_ms() -> u64 {
    1000
}

const fn default_poll_max_ms() -> u64 {
    16_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Pause after every search request before its results are used.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Pause between consecutive uploads of a transfer.
    #[serde(default = "default_transfer_pause_ms")]
    pub transfer_pause_ms: u64,

    /// Maximum listings taken while waiting for backend processing.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// First backoff delay; doubles per attempt.
    #[serde(default = "default_poll_initial_ms")]
    pub poll_initial_ms: u64,

    /// Backoff ceiling.
    #[serde(default = "default_poll_max_ms")]
    pub poll_max_ms: u64,

    /// Schema cache lifetime in seconds. `0` keeps schemas for the whole run.
    #[serde(default)]
    pub schema_ttl_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            transfer_pause_ms: default_transfer_pause_ms(),
            poll_attempts: default_poll_attempts(),
            poll_initial_ms: default_poll_initial_ms(),
            poll_max_ms: default_poll_max_ms(),
            schema_ttl_secs: 0,
        }
    }
}

impl PacingConfig {
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub const fn transfer_pause(&self) -> Duration {
        Duration::from_millis(self.transfer_pause_ms)
    }

    pub const fn poll_initial(&self) -> Duration {
        Duration::from_millis(self.poll_initial_ms)
    }

    pub const fn poll_max(&self) -> Duration {
        Duration::from_millis(self.poll_max_ms)
    }

    /// `None` when schemas never expire.
    pub const fn schema_ttl(&self) -> Option<Duration> {
        if self.schema_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.schema_ttl_secs))
        }
    }

    /// Reject polling bounds that can never succeed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_attempts == 0 {
            return Err(ConfigError::InvalidPacing {
                field: "poll_attempts",
                value: 0,
                reason: "at least one listing is needed".into(),
            });
        }
        if self.poll_initial_ms > self.poll_max_ms {
            return Err(ConfigError::InvalidPacing {
                field: "poll_initial_ms",
                value: self.poll_initial_ms,
                reason: format!("exceeds poll_max_ms ({})", self.poll_max_ms),
            });
        }
        Ok(())
    }
}
