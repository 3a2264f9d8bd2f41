//! Credential repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::{Credential, CredentialLookup, NewCredential};

use crate::store::{CredentialStore, InsertOutcome, expect_one_row};

const PRIMARY_KEY: &str = "credentials_pkey";

/// PostgreSQL-backed credential store.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    /// Create a new credential repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for CredentialRepository {
    async fn fetch(&self, lookup: &CredentialLookup) -> AppResult<Credential> {
        let query = match lookup {
            CredentialLookup::Id(id) => {
                sqlx::query_as::<_, Credential>("SELECT * FROM credentials WHERE user_id = $1")
                    .bind(*id)
            }
            CredentialLookup::Name(name) => {
                sqlx::query_as::<_, Credential>("SELECT * FROM credentials WHERE login_name = $1")
                    .bind(name.clone())
            }
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch credential", e))?
            .ok_or_else(|| AppError::not_found(format!("Credential {lookup} not found")))
    }

    async fn record_success(&self, user_id: Uuid, when: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE credentials SET login_success = $2, failure_count = 0, updated_at = $2 \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(when)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record login success", e))?;

        expect_one_row("record_success", result.rows_affected())
    }

    async fn record_failure(&self, user_id: Uuid, when: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE credentials SET login_failure = $2, failure_count = failure_count + 1, \
             updated_at = $2 WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(when)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record login failure", e))?;

        expect_one_row("record_failure", result.rows_affected())
    }

    async fn reset_credential(
        &self,
        user_id: Uuid,
        password_hash: &str,
        salt: &str,
        when: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE credentials SET password_hash = $2, salt = $3, login_success = $4, \
             failure_count = 0, updated_at = $4 WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(salt)
        .bind(when)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reset credential", e))?;

        expect_one_row("reset_credential", result.rows_affected())
    }

    async fn insert(&self, credential: NewCredential) -> AppResult<InsertOutcome> {
        let result = sqlx::query_as::<_, Credential>(
            "INSERT INTO credentials (user_id, login_name, password_hash, salt, failure_count, \
             updated_at, created_at) VALUES ($1, $2, $3, $4, 0, $5, $5) RETURNING *",
        )
        .bind(credential.user_id)
        .bind(&credential.login_name)
        .bind(&credential.password_hash)
        .bind(&credential.salt)
        .bind(credential.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(InsertOutcome::Inserted(row)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                if db.constraint() == Some(PRIMARY_KEY) {
                    debug!(user_id = %credential.user_id, "User id already taken");
                    Ok(InsertOutcome::IdTaken)
                } else {
                    Err(AppError::conflict(format!(
                        "Login name '{}' already exists",
                        credential.login_name
                    )))
                }
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to insert credential",
                e,
            )),
        }
    }
}
