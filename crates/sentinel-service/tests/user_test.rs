//! Integration tests for registration and self-service.

mod helpers;

use sentinel_core::ErrorKind;
use sentinel_entity::ApprovalStatus;
use sentinel_service::user::{ChangePasswordRequest, RegisterRequest, UpdateProfileRequest};

use helpers::{GOOD_PASSWORD, TestApp};

fn registration(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
        name: "New Hire".to_string(),
        department: Some("  Sales ".to_string()),
        position: Some(String::new()),
        phone: None,
    }
}

#[tokio::test]
async fn test_register_creates_pending_user_with_default_role() {
    let app = TestApp::new().await;

    let summary = app
        .state
        .user_service
        .register(registration("Hire@Example.com", GOOD_PASSWORD))
        .await
        .unwrap();

    assert_eq!(summary.email, "hire@example.com");
    assert_eq!(summary.approval_status, ApprovalStatus::Pending);
    assert_eq!(summary.roles, vec!["USER".to_string()]);
    assert_eq!(summary.department.as_deref(), Some("Sales"));
    assert!(summary.position.is_none());
}

#[tokio::test]
async fn test_registered_user_logs_in_only_after_approval() {
    let app = TestApp::new().await;
    let summary = app
        .state
        .user_service
        .register(registration("wait@example.com", GOOD_PASSWORD))
        .await
        .unwrap();

    let err = app.login("wait@example.com", GOOD_PASSWORD).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountDisabled);

    app.state
        .admin_user_service
        .update_approval_status(&app.master_ctx().await, summary.id, ApprovalStatus::Approved)
        .await
        .unwrap();

    let response = app.login("wait@example.com", GOOD_PASSWORD).await.unwrap();
    assert_eq!(response.user.id, summary.id);
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let app = TestApp::new().await;
    app.create_approved_user("taken@example.com").await;

    let err = app
        .state
        .user_service
        .register(registration(" TAKEN@example.com", GOOD_PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    assert!(
        !app.state
            .user_service
            .is_email_available("Taken@Example.com")
            .await
            .unwrap()
    );
    assert!(
        app.state
            .user_service
            .is_email_available("free@example.com")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_weak_password_reports_every_violation() {
    let app = TestApp::new().await;

    let err = app
        .state
        .user_service
        .register(registration("weak@example.com", "password"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.details.len() >= 3);
    assert!(
        app.state
            .user_service
            .is_email_available("weak@example.com")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_registration_input_checks() {
    let app = TestApp::new().await;
    let service = &app.state.user_service;

    let mut mismatch = registration("a@example.com", GOOD_PASSWORD);
    mismatch.confirm_password = "Other@Pw9".to_string();
    assert_eq!(
        service.register(mismatch).await.unwrap_err().kind,
        ErrorKind::Validation
    );

    let mut short_name = registration("b@example.com", GOOD_PASSWORD);
    short_name.name = " x ".to_string();
    assert_eq!(
        service.register(short_name).await.unwrap_err().kind,
        ErrorKind::Validation
    );

    let long_email = format!("{}@example.com", "a".repeat(100));
    assert_eq!(
        service
            .register(registration(&long_email, GOOD_PASSWORD))
            .await
            .unwrap_err()
            .kind,
        ErrorKind::Validation
    );

    assert_eq!(
        service
            .register(registration("   ", GOOD_PASSWORD))
            .await
            .unwrap_err()
            .kind,
        ErrorKind::Validation
    );
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;
    let user = app.create_approved_user("change@example.com").await;
    let ctx = app.ctx_for(&user);
    let service = &app.state.user_service;

    let request = |current: &str, new: &str, confirm: &str| ChangePasswordRequest {
        current_password: current.to_string(),
        new_password: new.to_string(),
        confirm_password: confirm.to_string(),
    };

    let err = service
        .change_password(&ctx, request("Wr0ng@Pass", "N3w@Vault9", "N3w@Vault9"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Current password is incorrect");

    let err = service
        .change_password(&ctx, request(GOOD_PASSWORD, "N3w@Vault9", "N3w@Vaulu9"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = service
        .change_password(&ctx, request(GOOD_PASSWORD, GOOD_PASSWORD, GOOD_PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = service
        .change_password(&ctx, request(GOOD_PASSWORD, "weakpass", "weakpass"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    service
        .change_password(&ctx, request(GOOD_PASSWORD, "N3w@Vault9", "N3w@Vault9"))
        .await
        .unwrap();

    assert_eq!(
        app.login("change@example.com", GOOD_PASSWORD)
            .await
            .unwrap_err()
            .kind,
        ErrorKind::InvalidCredentials
    );
    app.login("change@example.com", "N3w@Vault9").await.unwrap();
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new().await;
    let mut user = app.create_approved_user("profile@example.com").await;
    user.department = Some("Ops".to_string());
    let user = app.store_user(&user).await;
    let ctx = app.ctx_for(&user);

    let summary = app
        .state
        .user_service
        .update_profile(
            &ctx,
            UpdateProfileRequest {
                name: Some("  Pat Doe ".to_string()),
                department: Some(" ".to_string()),
                position: Some("Engineer".to_string()),
                phone: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(summary.name, "Pat Doe");
    assert!(summary.department.is_none());
    assert_eq!(summary.position.as_deref(), Some("Engineer"));

    let err = app
        .state
        .user_service
        .update_profile(
            &ctx,
            UpdateProfileRequest {
                name: Some("P".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_self_service_requires_a_caller() {
    let app = TestApp::new().await;

    let err = app
        .state
        .user_service
        .profile(&app.anonymous())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
}
