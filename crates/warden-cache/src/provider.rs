//! Session store manager that dispatches to the configured backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use warden_core::config::cache::CacheConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::{Clock, SessionStore};

/// Session store manager that wraps the configured backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct SessionStoreManager {
    inner: Arc<dyn SessionStore>,
}

impl SessionStoreManager {
    /// Create a new manager from configuration.
    ///
    /// `clock` drives expiry of the in-memory backend; Redis keeps its own time.
    #[cfg_attr(not(feature = "memory"), allow(unused_variables))]
    pub async fn new(config: &CacheConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let inner: Arc<dyn SessionStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis session store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisSessionStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory session store");
                Arc::new(crate::memory::MemorySessionStore::new(clock))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown session store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn SessionStore>) -> Self {
        Self { inner: store }
    }
}

#[async_trait]
impl SessionStore for SessionStoreManager {
    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.expire(key, ttl).await
    }

    async fn get_field(&self, key: &str, field: &str) -> AppResult<Option<String>> {
        self.inner.get_field(key, field).await
    }

    async fn get_fields(&self, key: &str) -> AppResult<HashMap<String, String>> {
        self.inner.get_fields(key).await
    }

    async fn set_fields(&self, key: &str, fields: &[(&str, &str)]) -> AppResult<()> {
        self.inner.set_fields(key, fields).await
    }

    async fn delete_fields(&self, key: &str, fields: &[&str]) -> AppResult<u64> {
        self.inner.delete_fields(key, fields).await
    }

    async fn add_member(&self, set: &str, member: &str) -> AppResult<u64> {
        self.inner.add_member(set, member).await
    }

    async fn remove_members(&self, set: &str, members: &[String]) -> AppResult<u64> {
        self.inner.remove_members(set, members).await
    }

    async fn members(&self, set: &str) -> AppResult<Vec<String>> {
        self.inner.members(set).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}
