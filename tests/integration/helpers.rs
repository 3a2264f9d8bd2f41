//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;

use warden_auth::{CounterReporter, LoginService, RandomTokenGenerator, SessionValidator};
use warden_cache::memory::MemorySessionStore;
use warden_core::config::{AuthConfig, SessionConfig};
use warden_core::traits::{AuthReporter, ManualClock, TokenGenerator};
use warden_database::MemoryCredentialStore;
use warden_entity::CredentialLookup;

/// Services wired over the in-memory stores and a manual clock.
pub struct TestApp {
    pub login: LoginService,
    pub sessions: SessionValidator,
    pub clock: Arc<ManualClock>,
    pub credentials: Arc<MemoryCredentialStore>,
    pub store: Arc<MemorySessionStore>,
    pub reporter: Arc<CounterReporter>,
}

impl TestApp {
    /// Create a test application with default settings.
    pub fn new() -> Self {
        Self::with_config(AuthConfig::default(), SessionConfig::default())
    }

    /// Create a test application with the given settings.
    pub fn with_config(auth: AuthConfig, session: SessionConfig) -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let credentials = Arc::new(MemoryCredentialStore::new());
        let store = Arc::new(MemorySessionStore::new(clock.clone()));
        let tokens: Arc<dyn TokenGenerator> = Arc::new(RandomTokenGenerator::new());
        let reporter = Arc::new(CounterReporter::new());
        let reporter_seam: Arc<dyn AuthReporter> = reporter.clone();

        let login = LoginService::new(
            credentials.clone(),
            clock.clone(),
            tokens.clone(),
            reporter_seam.clone(),
            auth,
        );
        let sessions = SessionValidator::new(
            store.clone(),
            tokens,
            clock.clone(),
            reporter_seam,
            session,
        );

        Self {
            login,
            sessions,
            clock,
            credentials,
            store,
            reporter,
        }
    }

    /// Register a user and return their id.
    pub async fn create_test_user(&self, login_name: &str, password: &str) -> uuid::Uuid {
        self.login
            .register(login_name, password)
            .await
            .expect("Failed to register test user")
            .user_id
    }

    /// Authenticate and mint a session, returning the token.
    pub async fn sign_in(&self, login_name: &str, password: &str) -> String {
        let profile = self
            .login
            .login(&lookup(login_name), password)
            .await
            .expect("Login failed");
        self.sessions
            .login(profile.user_id, "127.0.0.1")
            .await
            .expect("Session issuance failed")
            .token
    }
}

/// Look up a credential by login name.
pub fn lookup(login_name: &str) -> CredentialLookup {
    CredentialLookup::Name(login_name.to_string())
}
