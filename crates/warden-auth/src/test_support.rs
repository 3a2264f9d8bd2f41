//! Test doubles shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_cache::memory::MemorySessionStore;
use warden_core::config::{AuthConfig, SessionConfig};
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::{AuthReporter, ManualClock, SessionStore, TokenGenerator};
use warden_database::{CredentialStore, InsertOutcome, MemoryCredentialStore};
use warden_entity::{Credential, CredentialLookup, NewCredential};

use crate::login::LoginService;
use crate::metrics::CounterReporter;
use crate::session::SessionValidator;

/// Predictable tokens (`tok1`, `tok2`, ...) and queued user ids.
#[derive(Debug, Default)]
pub(crate) struct SequenceTokens {
    next: AtomicU64,
    ids: Mutex<VecDeque<Uuid>>,
}

impl SequenceTokens {
    /// Hand out `ids` before falling back to random ones.
    pub(crate) fn with_ids(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            next: AtomicU64::new(0),
            ids: Mutex::new(ids.into_iter().collect()),
        }
    }
}

impl TokenGenerator for SequenceTokens {
    fn token(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        format!("tok{n}")
    }

    fn user_id(&self) -> Uuid {
        self.ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Uuid::new_v4)
    }
}

/// Credential store that can be told to fail or stall.
#[derive(Debug, Default)]
pub(crate) struct FaultyCredentials {
    pub inner: MemoryCredentialStore,
    pub fail_record_failure: AtomicBool,
    pub stall_fetch: AtomicBool,
}

#[async_trait]
impl CredentialStore for FaultyCredentials {
    async fn fetch(&self, lookup: &CredentialLookup) -> AppResult<Credential> {
        if self.stall_fetch.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.fetch(lookup).await
    }

    async fn record_success(&self, user_id: Uuid, when: DateTime<Utc>) -> AppResult<()> {
        self.inner.record_success(user_id, when).await
    }

    async fn record_failure(&self, user_id: Uuid, when: DateTime<Utc>) -> AppResult<()> {
        if self.fail_record_failure.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset"));
        }
        self.inner.record_failure(user_id, when).await
    }

    async fn reset_credential(
        &self,
        user_id: Uuid,
        password_hash: &str,
        salt: &str,
        when: DateTime<Utc>,
    ) -> AppResult<()> {
        self.inner
            .reset_credential(user_id, password_hash, salt, when)
            .await
    }

    async fn insert(&self, credential: NewCredential) -> AppResult<InsertOutcome> {
        self.inner.insert(credential).await
    }
}

/// Session store whose individual answers can be sabotaged.
#[derive(Debug)]
pub(crate) struct FaultySessions {
    pub inner: MemorySessionStore,
    pub expire_misses: AtomicBool,
    pub add_member_noop: AtomicBool,
    pub fail_get_field: AtomicBool,
    pub fail_get_fields: AtomicBool,
    pub stall_members: AtomicBool,
}

impl FaultySessions {
    pub(crate) fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            inner: MemorySessionStore::new(clock),
            expire_misses: AtomicBool::new(false),
            add_member_noop: AtomicBool::new(false),
            fail_get_field: AtomicBool::new(false),
            fail_get_fields: AtomicBool::new(false),
            stall_members: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SessionStore for FaultySessions {
    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        if self.expire_misses.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.expire(key, ttl).await
    }

    async fn get_field(&self, key: &str, field: &str) -> AppResult<Option<String>> {
        if self.fail_get_field.load(Ordering::SeqCst) {
            return Err(AppError::cache("connection reset"));
        }
        self.inner.get_field(key, field).await
    }

    async fn get_fields(&self, key: &str) -> AppResult<HashMap<String, String>> {
        if self.fail_get_fields.load(Ordering::SeqCst) {
            return Err(AppError::cache("connection reset"));
        }
        self.inner.get_fields(key).await
    }

    async fn set_fields(&self, key: &str, fields: &[(&str, &str)]) -> AppResult<()> {
        self.inner.set_fields(key, fields).await
    }

    async fn delete_fields(&self, key: &str, fields: &[&str]) -> AppResult<u64> {
        self.inner.delete_fields(key, fields).await
    }

    async fn add_member(&self, set: &str, member: &str) -> AppResult<u64> {
        if self.add_member_noop.load(Ordering::SeqCst) {
            return Ok(0);
        }
        self.inner.add_member(set, member).await
    }

    async fn remove_members(&self, set: &str, members: &[String]) -> AppResult<u64> {
        self.inner.remove_members(set, members).await
    }

    async fn members(&self, set: &str) -> AppResult<Vec<String>> {
        if self.stall_members.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.members(set).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "faulty"
    }
}

pub(crate) fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc::now()))
}

pub(crate) fn login_service(
    store: Arc<dyn CredentialStore>,
    clock: Arc<ManualClock>,
    tokens: Arc<dyn TokenGenerator>,
    lockout_threshold: u32,
) -> (LoginService, Arc<CounterReporter>) {
    let reporter = Arc::new(CounterReporter::new());
    let config = AuthConfig {
        lockout_threshold,
        ..AuthConfig::default()
    };
    let reporter_seam: Arc<dyn AuthReporter> = reporter.clone();
    (
        LoginService::new(store, clock, tokens, reporter_seam, config),
        reporter,
    )
}

pub(crate) fn session_validator(
    store: Arc<dyn SessionStore>,
    clock: Arc<ManualClock>,
    max_concurrent: usize,
) -> (SessionValidator, Arc<CounterReporter>) {
    let reporter = Arc::new(CounterReporter::new());
    let config = SessionConfig {
        max_concurrent,
        ..SessionConfig::default()
    };
    let reporter_seam: Arc<dyn AuthReporter> = reporter.clone();
    (
        SessionValidator::new(
            store,
            Arc::new(SequenceTokens::default()),
            clock,
            reporter_seam,
            config,
        ),
        reporter,
    )
}
