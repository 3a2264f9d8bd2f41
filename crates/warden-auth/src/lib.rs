//! # warden-auth
//!
//! Password authentication and session lifecycle for Warden.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and comparison against stored credentials
//! - `login`: Login attempts, lockout, password change, registration
//! - `session`: Session token issuance, validation, revocation, and
//!   one-time pad hand-offs under a per-user concurrency cap
//! - `token`: OS-random token and identifier generation
//! - `metrics`: Outcome reporters
//! - `deadline`: Store call deadlines

pub mod deadline;
pub mod login;
pub mod metrics;
pub mod password;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use login::{LoginService, MAX_ID_ATTEMPTS};
pub use metrics::{CounterReporter, NoopReporter};
pub use password::{Comparison, PasswordHasher};
pub use session::SessionValidator;
pub use token::RandomTokenGenerator;
