//! # warden-database
//!
//! The credential store seam and its implementations: a PostgreSQL
//! repository for production and a concurrent in-memory store for tests
//! and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryCredentialStore;
pub use repositories::CredentialRepository;
pub use store::{CredentialStore, InsertOutcome};
