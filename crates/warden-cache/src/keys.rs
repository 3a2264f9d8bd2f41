//! Key builders for every entry Warden keeps in the session store.
//!
//! Backends add their own prefix on top of these.

use uuid::Uuid;

/// Namespace of session token hashes.
pub const TOKEN_NAMESPACE: &str = "token:";
/// Namespace of one-time pad hashes.
pub const PAD_NAMESPACE: &str = "pad:";

/// Hash field holding the owning user id.
pub const FIELD_USER_ID: &str = "user_id";
/// Hash field holding the remote address the entry was issued to.
pub const FIELD_REMOTE: &str = "remote";
/// Hash field holding a pad's redirect location.
pub const FIELD_REDIRECT: &str = "redirect";

/// Key of a session token hash.
pub fn token(value: &str) -> String {
    format!("{TOKEN_NAMESPACE}{value}")
}

/// Key of a one-time pad hash.
pub fn pad(value: &str) -> String {
    format!("{PAD_NAMESPACE}{value}")
}

/// Key of the set of token and pad keys issued to a user.
pub fn logins(user_id: Uuid) -> String {
    format!("logins:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let id = Uuid::nil();
        assert_eq!(token("abc"), "token:abc");
        assert_eq!(pad("abc"), "pad:abc");
        assert_eq!(logins(id), format!("logins:{id}"));
    }
}
