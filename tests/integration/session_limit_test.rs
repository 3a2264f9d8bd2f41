//! Integration tests for the per-user session cap.

mod helpers;

use std::time::Duration;

use warden_cache::keys;
use warden_core::config::{AuthConfig, SessionConfig};
use warden_core::error::ErrorKind;
use warden_core::traits::SessionStore;

use helpers::TestApp;

fn capped(max_concurrent: usize) -> TestApp {
    TestApp::with_config(
        AuthConfig::default(),
        SessionConfig {
            max_concurrent,
            ..SessionConfig::default()
        },
    )
}

#[tokio::test]
async fn test_cap_refuses_extra_session() {
    let app = capped(2);
    let user_id = app.create_test_user("ada", "pw").await;
    app.sign_in("ada", "pw").await;
    app.sign_in("ada", "pw").await;

    let err = app.sessions.login(user_id, "127.0.0.1").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::TooManyConcurrentSessions);
    assert_eq!(app.store.members(&keys::logins(user_id)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_cap_reclaims_expired_session() {
    let app = capped(2);
    let user_id = app.create_test_user("ada", "pw").await;
    app.sign_in("ada", "pw").await;
    app.clock.advance(Duration::from_secs(5 * 60));
    let recent = app.sign_in("ada", "pw").await;

    app.clock.advance(Duration::from_secs(11 * 60));
    app.sessions.login(user_id, "127.0.0.1").await.unwrap();

    let members = app.store.members(&keys::logins(user_id)).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.contains(&keys::token(&recent)));
}

#[tokio::test]
async fn test_logout_frees_a_slot() {
    let app = capped(1);
    let user_id = app.create_test_user("ada", "pw").await;
    let token = app.sign_in("ada", "pw").await;

    app.sessions.logout(&token).await.unwrap();
    app.sessions.login(user_id, "127.0.0.1").await.unwrap();
}

#[tokio::test]
async fn test_caps_are_per_user() {
    let app = capped(1);
    app.create_test_user("ada", "pw").await;
    app.create_test_user("grace", "pw").await;

    app.sign_in("ada", "pw").await;
    app.sign_in("grace", "pw").await;
}
