//! Session lifecycle configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sliding session TTL in minutes, applied at issuance and on every
    /// successful validation.
    #[serde(default = "default_ttl")]
    pub ttl_minutes: u64,
    /// Maximum concurrent sessions (tokens and pads) per user.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// One-time pad TTL in minutes.
    #[serde(default = "default_ttl")]
    pub pad_ttl_minutes: u64,
    /// Deadline applied to each session store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl SessionConfig {
    /// Session TTL as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }

    /// Pad TTL as a duration.
    pub fn pad_ttl(&self) -> Duration {
        Duration::from_secs(self.pad_ttl_minutes.saturating_mul(60))
    }

    /// Deadline for a single session store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl(),
            max_concurrent: default_max_concurrent(),
            pad_ttl_minutes: default_ttl(),
            store_timeout_ms: default_store_timeout(),
        }
    }
}

fn default_ttl() -> u64 {
    15
}

fn default_max_concurrent() -> usize {
    5
}

fn default_store_timeout() -> u64 {
    2000
}
