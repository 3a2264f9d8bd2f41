//! Concrete PostgreSQL repositories.

pub mod credential;

pub use credential::CredentialRepository;
