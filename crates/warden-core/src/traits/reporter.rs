//! Observability seam for authentication outcomes.

use crate::error::ErrorKind;

/// Receives the outcome of every service operation.
///
/// Implementations must not block; they are called inline.
pub trait AuthReporter: Send + Sync + std::fmt::Debug + 'static {
    /// The operation completed successfully.
    fn success(&self, operation: &'static str);

    /// The operation failed with the given kind.
    fn failure(&self, operation: &'static str, kind: ErrorKind);
}
