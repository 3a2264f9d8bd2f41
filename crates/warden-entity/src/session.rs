//! Session token and one-time pad grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live session token as handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    /// Opaque bearer value.
    pub token: String,
    /// Owner, when the session records a readable one.
    pub user_id: Option<Uuid>,
    /// Remote address the session was issued to.
    pub remote: Option<String>,
    /// When the session lapses unless validated again.
    pub expires_at: DateTime<Utc>,
}

/// A one-time pad issued for an out-of-band hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadGrant {
    pub pad: String,
    pub user_id: Uuid,
    /// Where the redeemer is sent.
    pub redirect: String,
    pub expires_at: DateTime<Utc>,
}
