//! Credential entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The persisted password credential of one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Credential {
    /// Owning user identifier.
    pub user_id: Uuid,
    /// Unique login name.
    pub login_name: String,
    /// Argon2 PHC hash string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Salt the hash was produced with.
    #[serde(skip_serializing)]
    pub salt: String,
    /// Last successful login.
    pub login_success: Option<DateTime<Utc>>,
    /// Last failed login.
    pub login_failure: Option<DateTime<Utc>>,
    /// Consecutive failures since the last success.
    pub failure_count: i32,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Whether login is refused regardless of the password.
    ///
    /// Lockout starts once the failure count is strictly greater than
    /// `threshold`.
    pub fn is_locked_out(&self, threshold: u32) -> bool {
        i64::from(self.failure_count) > i64::from(threshold)
    }

    /// The caller-facing view of this credential.
    pub fn profile(&self) -> Profile {
        Profile {
            user_id: self.user_id,
            login_name: self.login_name.clone(),
            last_login: self.login_success,
            updated_at: self.updated_at,
            created_at: self.created_at,
        }
    }
}

/// What a successful login hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub login_name: String,
    /// The last successful login *before* the attempt that produced this profile.
    pub last_login: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a credential.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub user_id: Uuid,
    pub login_name: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

impl NewCredential {
    /// The row as it looks right after insertion.
    pub fn into_credential(self) -> Credential {
        Credential {
            user_id: self.user_id,
            login_name: self.login_name,
            password_hash: self.password_hash,
            salt: self.salt,
            login_success: None,
            login_failure: None,
            failure_count: 0,
            updated_at: self.created_at,
            created_at: self.created_at,
        }
    }
}

/// How a credential is looked up: by user id or by login name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialLookup {
    Id(Uuid),
    Name(String),
}

impl CredentialLookup {
    /// Interpret free-form input: a UUID selects by id, anything else by name.
    pub fn parse(input: &str) -> Self {
        match Uuid::parse_str(input) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(input.to_string()),
        }
    }
}

impl From<Uuid> for CredentialLookup {
    fn from(id: Uuid) -> Self {
        Self::Id(id)
    }
}

impl fmt::Display for CredentialLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id:{id}"),
            Self::Name(name) => write!(f, "name:{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(failure_count: i32) -> Credential {
        NewCredential {
            user_id: Uuid::new_v4(),
            login_name: "ada".to_string(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
            created_at: Utc::now(),
        }
        .into_credential()
        .with_failures(failure_count)
    }

    impl Credential {
        fn with_failures(mut self, failure_count: i32) -> Self {
            self.failure_count = failure_count;
            self
        }
    }

    #[test]
    fn test_lockout_is_strictly_greater() {
        assert!(!credential(3).is_locked_out(3));
        assert!(credential(4).is_locked_out(3));
        assert!(!credential(0).is_locked_out(0));
    }

    #[test]
    fn test_lookup_parse() {
        let id = Uuid::new_v4();
        assert_eq!(CredentialLookup::parse(&id.to_string()), CredentialLookup::Id(id));
        assert_eq!(
            CredentialLookup::parse("ada"),
            CredentialLookup::Name("ada".to_string())
        );
    }

    #[test]
    fn test_secrets_not_serialized() {
        let json = serde_json::to_string(&credential(0)).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("\"salt\""));
    }
}
