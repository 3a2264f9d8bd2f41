//! Session token lifecycle under a per-user concurrency cap.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use warden_cache::keys;
use warden_core::config::SessionConfig;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::{AuthReporter, Clock, SessionStore, TokenGenerator};
use warden_entity::SessionGrant;

use crate::deadline::bounded;

/// Issues, validates, refreshes, and revokes session tokens.
///
/// A token is valid exactly while its key exists in the store. Each user
/// also owns a set of issued keys, which may lag behind expiry; the cap on
/// concurrent sessions is enforced against that set, evicting stale members
/// on demand. No lock spans the individual store calls, so two racing
/// issuances can overshoot the cap by a small margin.
#[derive(Clone)]
pub struct SessionValidator {
    pub(super) store: Arc<dyn SessionStore>,
    pub(super) tokens: Arc<dyn TokenGenerator>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) reporter: Arc<dyn AuthReporter>,
    pub(super) config: SessionConfig,
}

impl std::fmt::Debug for SessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionValidator")
            .field("backend", &self.store.backend_name())
            .field("config", &self.config)
            .finish()
    }
}

impl SessionValidator {
    /// Creates a new session validator with all required dependencies.
    pub fn new(
        store: Arc<dyn SessionStore>,
        tokens: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        reporter: Arc<dyn AuthReporter>,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            tokens,
            clock,
            reporter,
            config,
        }
    }

    /// Mint a session token for an authenticated user.
    ///
    /// Partial writes are not rolled back. If this future is dropped midway
    /// the session may or may not exist.
    pub async fn login(&self, user_id: Uuid, remote: &str) -> AppResult<SessionGrant> {
        let result = self.issue(user_id, remote).await;
        self.observe("issue_session", result)
    }

    /// Check a token and slide its expiry forward.
    pub async fn valid(&self, token: &str) -> AppResult<SessionGrant> {
        let result = self.refresh(token).await;
        self.observe("validate_session", result)
    }

    /// Revoke a token.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let result = self.revoke(token).await;
        self.observe("revoke_session", result)
    }

    async fn issue(&self, user_id: Uuid, remote: &str) -> AppResult<SessionGrant> {
        self.check_count(user_id).await?;

        let token = self.tokens.token();
        let owner = user_id.to_string();
        let fields = [(keys::FIELD_USER_ID, owner.as_str()), (keys::FIELD_REMOTE, remote)];
        let expires_at = self
            .register("login", user_id, &keys::token(&token), &fields, self.config.ttl())
            .await?;

        info!(user_id = %user_id, remote, "Session issued");
        Ok(SessionGrant {
            token,
            user_id: Some(user_id),
            remote: Some(remote.to_string()),
            expires_at,
        })
    }

    async fn refresh(&self, token: &str) -> AppResult<SessionGrant> {
        let key = keys::token(token);

        let live = self
            .call("exists", self.store.exists(&key))
            .await
            .map_err(|e| AppError::wrap("valid", e))?;
        if !live {
            return Err(AppError::forbidden("Session is not valid"));
        }

        let ttl = self.config.ttl();
        let refreshed = self
            .call("expire", self.store.expire(&key, ttl))
            .await
            .map_err(|e| AppError::wrap("valid", e))?;
        if !refreshed {
            return Err(AppError::internal(
                "valid: session disappeared while its expiry was being extended",
            ));
        }

        let mut fields = self
            .call("get_fields", self.store.get_fields(&key))
            .await
            .map_err(|e| AppError::wrap("valid", e))?;

        Ok(SessionGrant {
            token: token.to_string(),
            user_id: fields
                .remove(keys::FIELD_USER_ID)
                .and_then(|raw| Uuid::parse_str(&raw).ok()),
            remote: fields.remove(keys::FIELD_REMOTE),
            expires_at: self.deadline(ttl),
        })
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        self.refresh(token).await?;

        let key = keys::token(token);
        let owner = self
            .call("get_field", self.store.get_field(&key, keys::FIELD_USER_ID))
            .await
            .map_err(|e| AppError::wrap("logout", e))?
            .ok_or_else(|| AppError::forbidden("Session has no owner"))?;
        let user_id = parse_user_id("logout", &owner)?;

        self.call(
            "delete_fields",
            self.store
                .delete_fields(&key, &[keys::FIELD_USER_ID, keys::FIELD_REMOTE]),
        )
        .await
        .map_err(|e| AppError::wrap("logout", e))?;

        self.call(
            "remove_members",
            self.store.remove_members(&keys::logins(user_id), &[key]),
        )
        .await
        .map_err(|e| AppError::wrap("logout", e))?;

        info!(user_id = %user_id, "Session revoked");
        Ok(())
    }

    /// Approve a new session for `user_id` or refuse it.
    ///
    /// Below the cap this approves without touching the store further. At or
    /// above it, every member is probed; stale ones are removed in a single
    /// batch and the issuance is approved only if the remaining count is
    /// below the cap.
    pub(super) async fn check_count(&self, user_id: Uuid) -> AppResult<()> {
        let set = keys::logins(user_id);
        let members = self
            .call("members", self.store.members(&set))
            .await
            .map_err(|e| AppError::wrap("check_count", e))?;

        let max = self.config.max_concurrent;
        if members.len() < max {
            return Ok(());
        }

        let mut stale = Vec::new();
        for member in &members {
            let live = self
                .call("exists", self.store.exists(member))
                .await
                .map_err(|e| AppError::wrap("check_count", e))?;
            if !live {
                stale.push(member.clone());
            }
        }

        if stale.is_empty() {
            warn!(user_id = %user_id, sessions = members.len(), max, "Session cap reached");
            return Err(AppError::too_many_sessions(format!(
                "At most {max} concurrent sessions are allowed"
            )));
        }

        let removed = self
            .call("remove_members", self.store.remove_members(&set, &stale))
            .await
            .map_err(|e| AppError::wrap("check_count", e))?;
        let remaining = members.len().saturating_sub(removed as usize);
        debug!(user_id = %user_id, removed, remaining, "Evicted stale sessions");

        if remaining < max {
            Ok(())
        } else {
            warn!(user_id = %user_id, sessions = remaining, max, "Session cap reached");
            Err(AppError::too_many_sessions(format!(
                "At most {max} concurrent sessions are allowed"
            )))
        }
    }

    /// Write a hash, give it a TTL, and add it to the owner's set.
    pub(super) async fn register(
        &self,
        operation: &'static str,
        user_id: Uuid,
        key: &str,
        fields: &[(&str, &str)],
        ttl: Duration,
    ) -> AppResult<DateTime<Utc>> {
        self.call("set_fields", self.store.set_fields(key, fields))
            .await
            .map_err(|e| AppError::wrap(operation, e))?;

        let expiring = self
            .call("expire", self.store.expire(key, ttl))
            .await
            .map_err(|e| AppError::wrap(operation, e))?;
        if !expiring {
            return Err(AppError::internal(format!(
                "{operation}: entry vanished before its expiry was set"
            )));
        }

        let added = self
            .call("add_member", self.store.add_member(&keys::logins(user_id), key))
            .await
            .map_err(|e| AppError::wrap(operation, e))?;
        if added == 0 {
            return Err(AppError::internal(format!(
                "{operation}: entry was already registered to the user"
            )));
        }

        Ok(self.deadline(ttl))
    }

    pub(super) async fn call<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        bounded(operation, self.config.store_timeout(), call).await
    }

    pub(super) fn observe<T>(&self, operation: &'static str, result: AppResult<T>) -> AppResult<T> {
        match &result {
            Ok(_) => self.reporter.success(operation),
            Err(e) => self.reporter.failure(operation, e.kind),
        }
        result
    }

    fn deadline(&self, ttl: Duration) -> DateTime<Utc> {
        let now = self.clock.now();
        chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Parse a stored owner field.
pub(super) fn parse_user_id(operation: &str, raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| {
        AppError::with_source(
            ErrorKind::Internal,
            format!("{operation}: stored owner is not a user id"),
            e,
        )
    })
}
