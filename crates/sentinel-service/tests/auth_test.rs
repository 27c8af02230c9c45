//! Integration tests for the login, lockout, and token flows.

mod helpers;

use chrono::Duration;

use sentinel_core::{Clock, ErrorKind};
use sentinel_entity::ApprovalStatus;
use sentinel_store::CredentialStore;

use helpers::{GOOD_PASSWORD, TestApp};

#[tokio::test]
async fn test_master_login_returns_tokens_and_summary() {
    let app = TestApp::new().await;

    let response = app
        .login("  MASTER@Enterprise.com ", "Master@123")
        .await
        .unwrap();

    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.expires_in, 15 * 60);
    assert!(!response.access_token.is_empty());
    assert!(!response.refresh_token.is_empty());
    assert_eq!(response.user.email, "master@enterprise.com");
    assert_eq!(response.user.roles, vec!["SUPER_ADMIN".to_string()]);
    assert_eq!(response.user.last_login_at, Some(app.clock.now()));
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let app = TestApp::new().await;
    app.create_approved_user("alice@example.com").await;

    let unknown = app.login("nobody@example.com", GOOD_PASSWORD).await.unwrap_err();
    let wrong = app.login("alice@example.com", "Wr0ng@Pass").await.unwrap_err();

    assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
    assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);
    assert_eq!(unknown.message, wrong.message);
}

#[tokio::test]
async fn test_fifth_failure_locks_the_next_attempt() {
    let app = TestApp::new().await;
    let user = app.create_approved_user("bob@example.com").await;
    let start = app.clock.now();

    for _ in 0..4 {
        let err = app.login("bob@example.com", "Wr0ng@Pass").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    }
    assert_eq!(app.reload(&user).await.failed_login_attempts, 4);
    assert!(app.reload(&user).await.locked_until.is_none());

    // The failure that engages the lock still reports invalid credentials.
    let err = app.login("bob@example.com", "Wr0ng@Pass").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);

    let locked = app.reload(&user).await;
    assert_eq!(locked.failed_login_attempts, 5);
    assert_eq!(locked.locked_until, Some(start + Duration::minutes(30)));

    // Correct password is refused while the lock holds.
    app.clock.advance(Duration::minutes(29));
    let err = app.login("bob@example.com", GOOD_PASSWORD).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountDisabled);
    assert!(err.message.contains("locked"));

    app.clock.advance(Duration::minutes(1));
    app.login("bob@example.com", GOOD_PASSWORD).await.unwrap();

    let unlocked = app.reload(&user).await;
    assert_eq!(unlocked.failed_login_attempts, 0);
    assert!(unlocked.locked_until.is_none());
}

#[tokio::test]
async fn test_success_resets_failure_counter() {
    let app = TestApp::new().await;
    let user = app.create_approved_user("carol@example.com").await;

    for _ in 0..3 {
        let _ = app.login("carol@example.com", "Wr0ng@Pass").await;
    }
    assert_eq!(app.reload(&user).await.failed_login_attempts, 3);

    app.login("carol@example.com", GOOD_PASSWORD).await.unwrap();
    assert_eq!(app.reload(&user).await.failed_login_attempts, 0);
}

#[tokio::test]
async fn test_unapproved_accounts_are_refused() {
    let app = TestApp::new().await;
    app.create_user("pending@example.com", GOOD_PASSWORD, ApprovalStatus::Pending, &["USER"])
        .await;
    app.create_user("rejected@example.com", GOOD_PASSWORD, ApprovalStatus::Rejected, &["USER"])
        .await;

    let pending = app.login("pending@example.com", GOOD_PASSWORD).await.unwrap_err();
    let rejected = app.login("rejected@example.com", GOOD_PASSWORD).await.unwrap_err();

    assert_eq!(pending.kind, ErrorKind::AccountDisabled);
    assert_eq!(rejected.kind, ErrorKind::AccountDisabled);
    assert_ne!(pending.message, rejected.message);
}

#[tokio::test]
async fn test_state_refusals_do_not_count_as_failures() {
    let app = TestApp::new().await;
    let user = app
        .create_user("wait@example.com", GOOD_PASSWORD, ApprovalStatus::Pending, &["USER"])
        .await;

    let _ = app.login("wait@example.com", "Wr0ng@Pass").await;
    assert_eq!(app.reload(&user).await.failed_login_attempts, 0);
}

#[tokio::test]
async fn test_expired_password_is_refused() {
    let app = TestApp::new().await;
    let mut user = app.create_approved_user("old@example.com").await;
    user.password_changed_at = Some(app.clock.now() - Duration::days(91));
    app.state.store.save_user(&user).await.unwrap();

    let err = app.login("old@example.com", GOOD_PASSWORD).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::PasswordExpired);
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = TestApp::new().await;
    app.create_approved_user("dave@example.com").await;
    let login = app.login("dave@example.com", GOOD_PASSWORD).await.unwrap();

    app.clock.advance(Duration::hours(1));
    let refreshed = app
        .state
        .auth_service
        .refresh_token(&login.refresh_token)
        .await
        .unwrap();
    assert_eq!(refreshed.user.email, "dave@example.com");

    let ctx = app
        .state
        .auth_service
        .authenticate(&format!("Bearer {}", refreshed.access_token))
        .await
        .unwrap();
    assert_eq!(ctx.principal().unwrap().user_id, login.user.id);
}

#[tokio::test]
async fn test_refresh_rejects_access_and_expired_tokens() {
    let app = TestApp::new().await;
    app.create_approved_user("erin@example.com").await;
    let login = app.login("erin@example.com", GOOD_PASSWORD).await.unwrap();

    let err = app
        .state
        .auth_service
        .refresh_token(&login.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenInvalid);

    app.clock.advance(Duration::hours(24));
    let err = app
        .state
        .auth_service
        .refresh_token(&login.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenInvalid);
}

#[tokio::test]
async fn test_deleted_subject_cannot_refresh() {
    let app = TestApp::new().await;
    let user = app.create_approved_user("gone@example.com").await;
    let login = app.login("gone@example.com", GOOD_PASSWORD).await.unwrap();

    app.state.store.delete_user(user.id).await.unwrap();

    let err = app
        .state
        .auth_service
        .refresh_token(&login.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenInvalid);
}

#[tokio::test]
async fn test_access_token_expires() {
    let app = TestApp::new().await;
    app.create_approved_user("frank@example.com").await;
    let login = app.login("frank@example.com", GOOD_PASSWORD).await.unwrap();

    app.clock.advance(Duration::minutes(14));
    assert!(
        app.state
            .auth_service
            .authenticate(&login.access_token)
            .await
            .is_ok()
    );

    app.clock.advance(Duration::minutes(1));
    let err = app
        .state
        .auth_service
        .authenticate(&login.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenInvalid);
}

#[tokio::test]
async fn test_logout_requires_a_caller() {
    let app = TestApp::new().await;
    let user = app.create_approved_user("gina@example.com").await;

    assert!(app.state.auth_service.logout(&app.ctx_for(&user)).await.is_ok());
    assert_eq!(
        app.state
            .auth_service
            .logout(&app.anonymous())
            .await
            .unwrap_err()
            .kind,
        ErrorKind::Unauthenticated
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_failures_compare_at_most_threshold() {
    let app = TestApp::new().await;
    let user = app.create_approved_user("race@example.com").await;
    let auth = app.state.auth_service.clone();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let auth = auth.clone();
            tokio::spawn(async move {
                auth.login(sentinel_service::LoginRequest {
                    email: "race@example.com".into(),
                    password: "Wr0ng@Pass".into(),
                    remember_me: false,
                })
                .await
            })
        })
        .collect();

    let mut compared = 0;
    for result in futures::future::join_all(handles).await {
        let err = result.unwrap().unwrap_err();
        match err.kind {
            ErrorKind::InvalidCredentials => compared += 1,
            ErrorKind::AccountDisabled => {}
            other => panic!("unexpected error kind {other:?}"),
        }
    }

    // Every refused attempt is turned away before the password comparison.
    assert_eq!(compared, 5);
    let stored = app.reload(&user).await;
    assert_eq!(stored.failed_login_attempts, 5);
    assert!(stored.is_locked_at(app.clock.now()));

    let err = app.login("race@example.com", GOOD_PASSWORD).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountDisabled);
}

#[tokio::test]
async fn test_lock_expiry_opens_a_fresh_window() {
    let app = TestApp::new().await;
    let user = app.create_approved_user("again@example.com").await;

    for _ in 0..5 {
        let _ = app.login("again@example.com", "Wr0ng@Pass").await;
    }
    app.clock.advance(Duration::minutes(30));

    let err = app.login("again@example.com", "Wr0ng@Pass").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    let stored = app.reload(&user).await;
    assert_eq!(stored.failed_login_attempts, 1);
    assert!(stored.locked_until.is_none());

    app.login("again@example.com", GOOD_PASSWORD).await.unwrap();
}
