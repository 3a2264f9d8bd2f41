//! Redis session store implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::SessionStore;

use super::client::RedisClient;

/// Redis-backed session store.
///
/// Set members are stored unprefixed so they can be passed straight back
/// into the other calls.
#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    /// Create a new Redis session store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let mut conn = self.client.conn_mut();
        let result: bool = conn
            .expire(&full_key, seconds)
            .await
            .map_err(Self::map_err)?;
        Ok(result)
    }

    async fn get_field(&self, key: &str, field: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.hget(&full_key, field).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn get_fields(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: HashMap<String, String> =
            conn.hgetall(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set_fields(&self, key: &str, fields: &[(&str, &str)]) -> AppResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .hset_multiple(&full_key, fields)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete_fields(&self, key: &str, fields: &[&str]) -> AppResult<u64> {
        if fields.is_empty() {
            return Ok(0);
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let removed: u64 = conn.hdel(&full_key, fields).await.map_err(Self::map_err)?;
        Ok(removed)
    }

    async fn add_member(&self, set: &str, member: &str) -> AppResult<u64> {
        let full_key = self.client.prefixed_key(set);
        let mut conn = self.client.conn_mut();
        let added: u64 = conn.sadd(&full_key, member).await.map_err(Self::map_err)?;
        Ok(added)
    }

    async fn remove_members(&self, set: &str, members: &[String]) -> AppResult<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let full_key = self.client.prefixed_key(set);
        let mut conn = self.client.conn_mut();
        let removed: u64 = conn.srem(&full_key, members).await.map_err(Self::map_err)?;
        Ok(removed)
    }

    async fn members(&self, set: &str) -> AppResult<Vec<String>> {
        let full_key = self.client.prefixed_key(set);
        let mut conn = self.client.conn_mut();
        let result: Vec<String> = conn.smembers(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
