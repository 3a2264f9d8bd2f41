//! In-memory credential store backed by `DashMap`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::{Credential, CredentialLookup, NewCredential};

use crate::store::{CredentialStore, InsertOutcome, expect_one_row};

/// Concurrent in-memory credential store.
///
/// Login names are indexed separately so uniqueness holds under
/// concurrent inserts.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: DashMap<Uuid, Credential>,
    names: DashMap<String, Uuid>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    fn update(
        &self,
        operation: &str,
        user_id: Uuid,
        apply: impl FnOnce(&mut Credential),
    ) -> AppResult<()> {
        let rows = match self.credentials.get_mut(&user_id) {
            Some(mut entry) => {
                apply(entry.value_mut());
                1
            }
            None => 0,
        };
        expect_one_row(operation, rows)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn fetch(&self, lookup: &CredentialLookup) -> AppResult<Credential> {
        let user_id = match lookup {
            CredentialLookup::Id(id) => Some(*id),
            CredentialLookup::Name(name) => self.names.get(name).map(|id| *id.value()),
        };

        user_id
            .and_then(|id| self.credentials.get(&id).map(|c| c.value().clone()))
            .ok_or_else(|| AppError::not_found(format!("Credential {lookup} not found")))
    }

    async fn record_success(&self, user_id: Uuid, when: DateTime<Utc>) -> AppResult<()> {
        self.update("record_success", user_id, |c| {
            c.login_success = Some(when);
            c.failure_count = 0;
            c.updated_at = when;
        })
    }

    async fn record_failure(&self, user_id: Uuid, when: DateTime<Utc>) -> AppResult<()> {
        self.update("record_failure", user_id, |c| {
            c.login_failure = Some(when);
            c.failure_count = c.failure_count.saturating_add(1);
            c.updated_at = when;
        })
    }

    async fn reset_credential(
        &self,
        user_id: Uuid,
        password_hash: &str,
        salt: &str,
        when: DateTime<Utc>,
    ) -> AppResult<()> {
        self.update("reset_credential", user_id, |c| {
            c.password_hash = password_hash.to_string();
            c.salt = salt.to_string();
            c.login_success = Some(when);
            c.failure_count = 0;
            c.updated_at = when;
        })
    }

    async fn insert(&self, credential: NewCredential) -> AppResult<InsertOutcome> {
        let user_id = credential.user_id;
        match self.names.entry(credential.login_name.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(format!(
                    "Login name '{}' already exists",
                    credential.login_name
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(user_id);
            }
        }

        let login_name = credential.login_name.clone();
        match self.credentials.entry(user_id) {
            Entry::Occupied(_) => {
                self.names.remove(&login_name);
                debug!(user_id = %user_id, "User id already taken");
                Ok(InsertOutcome::IdTaken)
            }
            Entry::Vacant(slot) => {
                let stored = credential.into_credential();
                slot.insert(stored.clone());
                Ok(InsertOutcome::Inserted(stored))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use warden_core::error::ErrorKind;

    use super::*;

    fn new_credential(user_id: Uuid, login_name: &str) -> NewCredential {
        NewCredential {
            user_id,
            login_name: login_name.to_string(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
            created_at: Utc::now(),
        }
    }

    async fn seeded(login_name: &str) -> (MemoryCredentialStore, Uuid) {
        let store = MemoryCredentialStore::new();
        let id = Uuid::new_v4();
        let outcome = store.insert(new_credential(id, login_name)).await.unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));
        (store, id)
    }

    #[tokio::test]
    async fn test_fetch_by_id_and_name() {
        let (store, id) = seeded("ada").await;
        let by_id = store.fetch(&CredentialLookup::Id(id)).await.unwrap();
        let by_name = store
            .fetch(&CredentialLookup::Name("ada".to_string()))
            .await
            .unwrap();
        assert_eq!(by_id.user_id, by_name.user_id);
        assert_eq!(by_id.failure_count, 0);
    }

    #[tokio::test]
    async fn test_fetch_unknown_is_not_found() {
        let store = MemoryCredentialStore::new();
        let err = store
            .fetch(&CredentialLookup::Name("nobody".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_failure_then_success_resets_count() {
        let (store, id) = seeded("ada").await;
        let first = Utc::now();
        store.record_failure(id, first).await.unwrap();
        store.record_failure(id, first).await.unwrap();

        let failed = store.fetch(&id.into()).await.unwrap();
        assert_eq!(failed.failure_count, 2);
        assert_eq!(failed.login_failure, Some(first));
        assert_eq!(failed.password_hash, "hash");

        let later = first + chrono::Duration::seconds(5);
        store.record_success(id, later).await.unwrap();
        let ok = store.fetch(&id.into()).await.unwrap();
        assert_eq!(ok.failure_count, 0);
        assert_eq!(ok.login_success, Some(later));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = MemoryCredentialStore::new();
        let err = store.record_success(Uuid::new_v4(), Utc::now()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_reset_replaces_hash_and_salt() {
        let (store, id) = seeded("ada").await;
        store.record_failure(id, Utc::now()).await.unwrap();
        store
            .reset_credential(id, "new-hash", "new-salt", Utc::now())
            .await
            .unwrap();
        let reset = store.fetch(&id.into()).await.unwrap();
        assert_eq!(reset.password_hash, "new-hash");
        assert_eq!(reset.salt, "new-salt");
        assert_eq!(reset.failure_count, 0);
    }

    #[tokio::test]
    async fn test_insert_collisions() {
        let (store, id) = seeded("ada").await;

        let taken = store.insert(new_credential(id, "grace")).await.unwrap();
        assert!(matches!(taken, InsertOutcome::IdTaken));
        assert!(
            store
                .fetch(&CredentialLookup::Name("grace".to_string()))
                .await
                .is_err()
        );

        let err = store
            .insert(new_credential(Uuid::new_v4(), "ada"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.len(), 1);
    }
}
