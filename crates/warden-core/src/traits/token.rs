//! Random identifier source.

use uuid::Uuid;

/// Produces unguessable session values and fresh user identifiers.
pub trait TokenGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// A fresh opaque token value, safe to embed in a key.
    fn token(&self) -> String;

    /// A fresh user identifier.
    fn user_id(&self) -> Uuid;
}
