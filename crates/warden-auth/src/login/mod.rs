//! Password login flows.

pub mod service;

pub use service::{LoginService, MAX_ID_ATTEMPTS};
