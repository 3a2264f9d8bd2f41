//! Session store trait for volatile key-value backends.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Narrow capability interface over a volatile key-value store.
///
/// Keys hold either a field hash (session tokens, pads) or a member set
/// (per-user session sets). Implementations are responsible for key
/// prefixing and TTL enforcement. No authentication logic lives here.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Check whether a key exists and has not expired.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Set the TTL on an existing key.
    ///
    /// Returns `false` if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Get a single hash field. Returns `None` if the key or field is absent.
    async fn get_field(&self, key: &str, field: &str) -> AppResult<Option<String>>;

    /// Get every field of a hash. An absent key yields an empty map.
    async fn get_fields(&self, key: &str) -> AppResult<HashMap<String, String>>;

    /// Set hash fields, creating the key if needed. Does not touch the TTL
    /// of an existing key.
    async fn set_fields(&self, key: &str, fields: &[(&str, &str)]) -> AppResult<()>;

    /// Delete hash fields. Returns the number of fields removed.
    ///
    /// A hash left without fields disappears.
    async fn delete_fields(&self, key: &str, fields: &[&str]) -> AppResult<u64>;

    /// Add a member to a set. Returns the number of members newly added.
    async fn add_member(&self, set: &str, member: &str) -> AppResult<u64>;

    /// Remove members from a set in one call. Returns the number removed.
    async fn remove_members(&self, set: &str, members: &[String]) -> AppResult<u64>;

    /// List every member of a set. An absent set yields an empty list.
    async fn members(&self, set: &str) -> AppResult<Vec<String>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Human-readable backend name.
    fn backend_name(&self) -> &'static str;
}
