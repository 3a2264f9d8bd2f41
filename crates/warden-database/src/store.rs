//! Credential store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::{Credential, CredentialLookup, NewCredential};

/// Outcome of creating a credential.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The credential was stored.
    Inserted(Credential),
    /// Another credential already owns the user id.
    IdTaken,
}

/// Persistent record of one credential per user.
///
/// Every mutating call must change exactly one record: zero is reported as
/// `NotFound`, more than one as `Internal`.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Load a credential by user id or login name.
    async fn fetch(&self, lookup: &CredentialLookup) -> AppResult<Credential>;

    /// Mark a successful login: last success becomes `when`, failures reset to 0.
    async fn record_success(&self, user_id: Uuid, when: DateTime<Utc>) -> AppResult<()>;

    /// Mark a failed login: last failure becomes `when`, failures grow by 1.
    async fn record_failure(&self, user_id: Uuid, when: DateTime<Utc>) -> AppResult<()>;

    /// Replace the hash and salt, counting as a successful login.
    async fn reset_credential(
        &self,
        user_id: Uuid,
        password_hash: &str,
        salt: &str,
        when: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Create a credential.
    ///
    /// A login name already in use is a `Conflict` error.
    async fn insert(&self, credential: NewCredential) -> AppResult<InsertOutcome>;
}

/// Check that a mutation touched exactly one record.
pub(crate) fn expect_one_row(operation: &str, rows: u64) -> AppResult<()> {
    match rows {
        1 => Ok(()),
        0 => Err(AppError::not_found(format!("{operation}: credential not updated"))),
        n => Err(AppError::internal(format!(
            "{operation}: expected 1 credential updated, got {n}"
        ))),
    }
}
