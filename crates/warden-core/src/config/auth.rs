//! Credential verification configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credential verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Failure count above which login is refused.
    ///
    /// A credential is locked out once its consecutive failure count is
    /// strictly greater than this value.
    #[serde(default = "default_lockout_threshold")]
    pub lockout_threshold: u32,
    /// Deadline applied to each credential store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
    /// Length of passwords generated by a reset.
    #[serde(default = "default_reset_length")]
    pub reset_password_length: usize,
}

impl AuthConfig {
    /// Deadline for a single credential store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            lockout_threshold: default_lockout_threshold(),
            store_timeout_ms: default_store_timeout(),
            reset_password_length: default_reset_length(),
        }
    }
}

fn default_lockout_threshold() -> u32 {
    5
}

fn default_store_timeout() -> u64 {
    2000
}

fn default_reset_length() -> usize {
    16
}
