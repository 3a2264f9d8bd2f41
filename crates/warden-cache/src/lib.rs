//! # warden-cache
//!
//! Session store backends for Warden. Supports two modes:
//!
//! - **memory**: In-process store on [dashmap](https://crates.io/crates/dashmap),
//!   expiring entries against an injected clock
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The backend is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::SessionStoreManager;
