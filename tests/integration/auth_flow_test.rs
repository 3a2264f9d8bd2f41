//! Integration tests for the login-then-session flow.

mod helpers;

use std::time::Duration;

use warden_core::config::{AuthConfig, SessionConfig};
use warden_core::error::ErrorKind;
use warden_database::CredentialStore;

use helpers::{TestApp, lookup};

#[tokio::test]
async fn test_login_issue_validate_logout() {
    let app = TestApp::new();
    app.create_test_user("ada", "correct horse").await;

    let token = app.sign_in("ada", "correct horse").await;
    app.sessions.valid(&token).await.unwrap();

    app.sessions.logout(&token).await.unwrap();
    let err = app.sessions.valid(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_session_lapses_after_ttl() {
    let app = TestApp::with_config(
        AuthConfig::default(),
        SessionConfig {
            ttl_minutes: 15,
            ..SessionConfig::default()
        },
    );
    app.create_test_user("ada", "pw").await;
    let token = app.sign_in("ada", "pw").await;

    app.clock.advance(Duration::from_secs(16 * 60));
    let err = app.sessions.valid(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_lockout_after_threshold() {
    let app = TestApp::with_config(
        AuthConfig {
            lockout_threshold: 3,
            ..AuthConfig::default()
        },
        SessionConfig::default(),
    );
    app.create_test_user("ada", "correct").await;

    for _ in 0..4 {
        let err = app.login.login(&lookup("ada"), "wrong").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadCredentials);
    }
    let err = app.login.login(&lookup("ada"), "correct").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::LockedOut);
    assert_eq!(app.reporter.operation("login").failed, 5);
}

#[tokio::test]
async fn test_pad_hand_off_resets_password() {
    let app = TestApp::new();
    let user_id = app.create_test_user("ada", "forgotten").await;
    let token = app.sign_in("ada", "forgotten").await;

    let grant = app
        .sessions
        .issue_pad(user_id, "127.0.0.1", "https://example.test/reset")
        .await
        .unwrap();
    let redirect = app.sessions.redeem_pad(&grant.pad).await.unwrap();
    assert_eq!(redirect, "https://example.test/reset");

    let owner = app.sessions.complete_pad(&grant.pad).await.unwrap();
    assert_eq!(owner, user_id);
    let password = app.login.reset_password(owner).await.unwrap();

    let err = app.sessions.valid(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = app.login.login(&lookup("ada"), "forgotten").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadCredentials);

    app.sign_in("ada", &password).await;
    let credential = app.credentials.fetch(&lookup("ada")).await.unwrap();
    assert_eq!(credential.failure_count, 0);
}
