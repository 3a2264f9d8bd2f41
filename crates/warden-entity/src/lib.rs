//! # warden-entity
//!
//! Domain value types shared by the Warden stores and services.

pub mod credential;
pub mod session;

pub use credential::{Credential, CredentialLookup, NewCredential, Profile};
pub use session::{PadGrant, SessionGrant};
