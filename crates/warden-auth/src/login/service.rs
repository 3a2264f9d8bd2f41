//! Login orchestration over the credential store.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use warden_core::config::AuthConfig;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::{AuthReporter, Clock, TokenGenerator};
use warden_database::{CredentialStore, InsertOutcome};
use warden_entity::{Credential, CredentialLookup, NewCredential, Profile};

use crate::deadline::bounded;
use crate::password::{Comparison, PasswordHasher};

/// Attempts at finding an unused user id before registration gives up.
pub const MAX_ID_ATTEMPTS: usize = 3;

/// Authenticates users by password and keeps failure bookkeeping.
///
/// Each attempt moves through fetch, lockout check, password comparison,
/// and finally records the outcome on the credential. An unknown user and
/// a wrong password are reported identically.
#[derive(Clone)]
pub struct LoginService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenGenerator>,
    reporter: Arc<dyn AuthReporter>,
    config: AuthConfig,
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService")
            .field("config", &self.config)
            .finish()
    }
}

impl LoginService {
    /// Creates a new login service with all required dependencies.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenGenerator>,
        reporter: Arc<dyn AuthReporter>,
        config: AuthConfig,
    ) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
            clock,
            tokens,
            reporter,
            config,
        }
    }

    /// Authenticate with a password.
    ///
    /// The returned profile carries the last successful login from before
    /// this attempt.
    pub async fn login(&self, lookup: &CredentialLookup, password: &str) -> AppResult<Profile> {
        let result = self.authenticate(lookup, password).await;
        self.observe("login", result.map(|credential| credential.profile()))
    }

    /// Change a password after authenticating with the old one.
    pub async fn change_password(
        &self,
        lookup: &CredentialLookup,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let result = self.replace_password(lookup, old_password, new_password).await;
        self.observe("change_password", result)
    }

    /// Create a credential under a freshly generated user id.
    ///
    /// Id collisions are retried up to [`MAX_ID_ATTEMPTS`] times. A login
    /// name already in use is a `Conflict`.
    pub async fn register(&self, login_name: &str, password: &str) -> AppResult<Profile> {
        let result = self.create(login_name, password).await;
        self.observe("register", result)
    }

    /// Replace the password with a generated one and return it.
    ///
    /// Meant to run after a completed one-time pad hand-off. The plaintext is
    /// returned exactly once and is never stored.
    pub async fn reset_password(&self, user_id: Uuid) -> AppResult<String> {
        let result = self.regenerate(user_id).await;
        self.observe("reset_password", result)
    }

    /// Read a profile without touching the credential.
    pub async fn profile(&self, lookup: &CredentialLookup) -> AppResult<Profile> {
        let credential = self
            .call("fetch", self.store.fetch(lookup))
            .await
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => e,
                _ => AppError::wrap("profile", e),
            })?;
        Ok(credential.profile())
    }

    /// Run an attempt to completion and return the credential as it was
    /// read before the attempt.
    async fn authenticate(
        &self,
        lookup: &CredentialLookup,
        password: &str,
    ) -> AppResult<Credential> {
        let credential = match self.call("fetch", self.store.fetch(lookup)).await {
            Ok(credential) => credential,
            Err(e) if e.kind == ErrorKind::NotFound => {
                debug!(lookup = %lookup, "Login for unknown credential");
                return Err(AppError::bad_credentials());
            }
            Err(e) => return Err(AppError::wrap("fetch", e)),
        };

        if credential.is_locked_out(self.config.lockout_threshold) {
            warn!(
                user_id = %credential.user_id,
                failure_count = credential.failure_count,
                "Login refused: credential locked out"
            );
            return Err(AppError::locked_out());
        }

        let now = self.clock.now();
        match self.hasher.compare(&credential, password) {
            Ok(Comparison::Match) => {}
            Ok(Comparison::Mismatch) => {
                self.call(
                    "record_failure",
                    self.store.record_failure(credential.user_id, now),
                )
                .await
                .map_err(|e| AppError::wrap("record_failure", e))?;
                info!(
                    user_id = %credential.user_id,
                    failure_count = credential.failure_count + 1,
                    "Login rejected: wrong password"
                );
                return Err(AppError::bad_credentials());
            }
            Err(e) => return Err(AppError::wrap("compare", e)),
        }

        self.call(
            "record_success",
            self.store.record_success(credential.user_id, now),
        )
        .await
        .map_err(|e| AppError::wrap("record_success", e))?;

        info!(user_id = %credential.user_id, "Login accepted");
        Ok(credential)
    }

    async fn replace_password(
        &self,
        lookup: &CredentialLookup,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let credential = self.authenticate(lookup, old_password).await?;

        let unchanged = self
            .hasher
            .compare(&credential, new_password)
            .map_err(|e| AppError::wrap("compare", e))?;
        if unchanged == Comparison::Match {
            return Err(AppError::passwords_unchanged());
        }

        self.store_password(credential.user_id, new_password, "change_password")
            .await?;
        info!(user_id = %credential.user_id, "Password changed");
        Ok(())
    }

    async fn create(&self, login_name: &str, password: &str) -> AppResult<Profile> {
        if login_name.trim().is_empty() {
            return Err(AppError::validation("Login name must not be empty"));
        }
        if password.is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }

        let salt = self.hasher.generate_salt();
        let password_hash = self
            .hasher
            .hash(password, &salt)
            .map_err(|e| AppError::wrap("register", e))?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = NewCredential {
                user_id: self.tokens.user_id(),
                login_name: login_name.to_string(),
                password_hash: password_hash.clone(),
                salt: salt.clone(),
                created_at: self.clock.now(),
            };
            let user_id = candidate.user_id;

            match self.call("insert", self.store.insert(candidate)).await {
                Ok(InsertOutcome::Inserted(credential)) => {
                    info!(user_id = %credential.user_id, "Credential registered");
                    return Ok(credential.profile());
                }
                Ok(InsertOutcome::IdTaken) => {
                    warn!(user_id = %user_id, attempt, "Generated user id already taken");
                }
                Err(e) if e.kind == ErrorKind::Conflict => return Err(e),
                Err(e) => return Err(AppError::wrap("insert", e)),
            }
        }

        Err(AppError::internal(format!(
            "register: no unused user id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    async fn regenerate(&self, user_id: Uuid) -> AppResult<String> {
        let password: String = self
            .tokens
            .token()
            .chars()
            .take(self.config.reset_password_length.max(1))
            .collect();

        self.store_password(user_id, &password, "reset_password")
            .await?;
        info!(user_id = %user_id, "Password reset");
        Ok(password)
    }

    /// Hash `password` under a fresh salt and write it to the credential.
    async fn store_password(
        &self,
        user_id: Uuid,
        password: &str,
        operation: &'static str,
    ) -> AppResult<()> {
        let salt = self.hasher.generate_salt();
        let password_hash = self
            .hasher
            .hash(password, &salt)
            .map_err(|e| AppError::wrap(operation, e))?;

        self.call(
            "reset_credential",
            self.store
                .reset_credential(user_id, &password_hash, &salt, self.clock.now()),
        )
        .await
        .map_err(|e| match e.kind {
            ErrorKind::NotFound if operation == "reset_password" => e,
            _ => AppError::wrap(operation, e),
        })
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        bounded(operation, self.config.store_timeout(), call).await
    }

    fn observe<T>(&self, operation: &'static str, result: AppResult<T>) -> AppResult<T> {
        match &result {
            Ok(_) => self.reporter.success(operation),
            Err(e) => self.reporter.failure(operation, e.kind),
        }
        result
    }
}
