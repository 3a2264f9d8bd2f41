//! DashMap-backed session store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use warden_core::result::AppResult;
use warden_core::traits::{Clock, SessionStore, SystemClock};

/// A field hash with an optional deadline.
#[derive(Debug, Default)]
struct ExpiringHash {
    fields: HashMap<String, String>,
    expires_at: Option<DateTime<Utc>>,
}

impl ExpiringHash {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process session store.
///
/// Expiry is read from the injected [`Clock`], so a manual clock can
/// simulate elapsed time. Expired hashes are purged lazily on access.
/// TTLs apply to hashes only; sets never expire.
#[derive(Debug)]
pub struct MemorySessionStore {
    hashes: DashMap<String, ExpiringHash>,
    sets: DashMap<String, HashSet<String>>,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    /// Create a store that expires entries against `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            hashes: DashMap::new(),
            sets: DashMap::new(),
            clock,
        }
    }

    /// Drop the hash at `key` if its deadline has passed.
    fn purge(&self, key: &str) {
        let now = self.clock.now();
        self.hashes.remove_if(key, |_, hash| hash.is_expired(now));
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.purge(key);
        Ok(self.hashes.contains_key(key) || self.sets.contains_key(key))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.purge(key);
        // A TTL too large to represent means no deadline.
        let deadline = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl));
        match self.hashes.get_mut(key) {
            Some(mut hash) => {
                hash.expires_at = deadline;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_field(&self, key: &str, field: &str) -> AppResult<Option<String>> {
        self.purge(key);
        Ok(self
            .hashes
            .get(key)
            .and_then(|hash| hash.fields.get(field).cloned()))
    }

    async fn get_fields(&self, key: &str) -> AppResult<HashMap<String, String>> {
        self.purge(key);
        Ok(self
            .hashes
            .get(key)
            .map(|hash| hash.fields.clone())
            .unwrap_or_default())
    }

    async fn set_fields(&self, key: &str, fields: &[(&str, &str)]) -> AppResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        self.purge(key);
        let mut hash = self.hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            hash.fields.insert((*field).to_string(), (*value).to_string());
        }
        Ok(())
    }

    async fn delete_fields(&self, key: &str, fields: &[&str]) -> AppResult<u64> {
        self.purge(key);
        let removed = match self.hashes.get_mut(key) {
            Some(mut hash) => fields
                .iter()
                .filter(|field| hash.fields.remove(**field).is_some())
                .count() as u64,
            None => 0,
        };
        self.hashes.remove_if(key, |_, hash| hash.fields.is_empty());
        Ok(removed)
    }

    async fn add_member(&self, set: &str, member: &str) -> AppResult<u64> {
        let mut members = self.sets.entry(set.to_string()).or_default();
        Ok(u64::from(members.insert(member.to_string())))
    }

    async fn remove_members(&self, set: &str, members: &[String]) -> AppResult<u64> {
        let removed = match self.sets.get_mut(set) {
            Some(mut current) => members
                .iter()
                .filter(|member| current.remove(member.as_str()))
                .count() as u64,
            None => 0,
        };
        self.sets.remove_if(set, |_, current| current.is_empty());
        Ok(removed)
    }

    async fn members(&self, set: &str) -> AppResult<Vec<String>> {
        Ok(self
            .sets
            .get(set)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
