//! Integration tests for role administration and seeding.

mod helpers;

use sentinel_core::ErrorKind;
use sentinel_entity::ApprovalStatus;
use sentinel_service::role::{CreateRoleRequest, UpdateRoleRequest};

use helpers::{GOOD_PASSWORD, TestApp};

fn auditor(permissions: &[&str]) -> CreateRoleRequest {
    CreateRoleRequest {
        name: "AUDITOR".to_string(),
        description: Some("Read-only user audits".to_string()),
        permission_names: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_system_roles_refuse_update_and_delete_alike() {
    let app = TestApp::new().await;
    let master = app.master_ctx().await;
    let roles = &app.state.role_service;

    let admin_role = app.role("ADMIN").await;

    let update = roles
        .update_role(
            &master,
            admin_role.id,
            UpdateRoleRequest {
                description: Some("changed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    let delete = roles.delete_role(&master, admin_role.id).await.unwrap_err();

    assert_eq!(update.kind, ErrorKind::ProtectedResource);
    assert_eq!(delete.kind, ErrorKind::ProtectedResource);
    assert_eq!(update.message, delete.message);
}

#[tokio::test]
async fn test_custom_role_grants_flow_to_holders() {
    let app = TestApp::new().await;
    let master = app.master_ctx().await;
    let user = app.create_approved_user("audit@example.com").await;
    let resolver = app.state.permission_gate.resolver();

    let view = app
        .state
        .role_service
        .create_role(&master, auditor(&["USER_READ", "USER_READ"]))
        .await
        .unwrap();
    assert!(!view.role.is_system);
    assert_eq!(view.permissions, vec!["USER_READ".to_string()]);
    assert_eq!(view.user_count, 0);

    app.state
        .admin_user_service
        .update_user_roles(&master, user.id, &["USER".to_string(), "AUDITOR".to_string()])
        .await
        .unwrap();
    assert!(resolver.has_permission(user.id, "USER_READ").await.unwrap());
    assert!(!resolver.has_permission(user.id, "USER_DELETE").await.unwrap());

    app.state
        .role_service
        .update_role(
            &master,
            view.role.id,
            UpdateRoleRequest {
                permission_names: Some(vec!["USER_READ".to_string(), "USER_DELETE".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(resolver.has_permission(user.id, "USER_DELETE").await.unwrap());

    let holders = app
        .state
        .role_service
        .users_with_role(&master, "AUDITOR")
        .await
        .unwrap();
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].id, user.id);
}

#[tokio::test]
async fn test_held_role_cannot_be_deleted() {
    let app = TestApp::new().await;
    let master = app.master_ctx().await;
    let user = app.create_approved_user("holder@example.com").await;
    let roles = &app.state.role_service;

    let view = roles.create_role(&master, auditor(&[])).await.unwrap();
    app.state
        .admin_user_service
        .update_user_roles(&master, user.id, &["AUDITOR".to_string()])
        .await
        .unwrap();

    let err = roles.delete_role(&master, view.role.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    app.state
        .admin_user_service
        .update_user_roles(&master, user.id, &["USER".to_string()])
        .await
        .unwrap();
    roles.delete_role(&master, view.role.id).await.unwrap();

    let err = roles.get_role(&master, view.role.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_create_role_rejections() {
    let app = TestApp::new().await;
    let master = app.master_ctx().await;
    let roles = &app.state.role_service;

    let err = roles
        .create_role(&master, auditor(&["NOT_A_PERMISSION"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    roles.create_role(&master, auditor(&[])).await.unwrap();
    let err = roles.create_role(&master, auditor(&[])).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let mut blank = auditor(&[]);
    blank.name = "  ".to_string();
    assert_eq!(
        roles.create_role(&master, blank).await.unwrap_err().kind,
        ErrorKind::Validation
    );
}

#[tokio::test]
async fn test_rename_onto_existing_role_conflicts() {
    let app = TestApp::new().await;
    let master = app.master_ctx().await;
    let roles = &app.state.role_service;

    let view = roles.create_role(&master, auditor(&[])).await.unwrap();
    let err = roles
        .update_role(
            &master,
            view.role.id,
            UpdateRoleRequest {
                name: Some("ADMIN".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let renamed = roles
        .update_role(
            &master,
            view.role.id,
            UpdateRoleRequest {
                name: Some("REVIEWER".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.role.name, "REVIEWER");
}

#[tokio::test]
async fn test_permission_catalog() {
    let app = TestApp::new().await;
    let master = app.master_ctx().await;
    let roles = &app.state.role_service;

    assert_eq!(roles.list_permissions(&master).await.unwrap().len(), 22);

    let grouped = roles.permissions_by_category(&master).await.unwrap();
    assert_eq!(grouped.values().map(Vec::len).sum::<usize>(), 22);
    assert_eq!(grouped["USER"].len(), 6);

    let stats = roles.statistics(&master).await.unwrap();
    assert_eq!(stats.total_roles, 3);
    assert_eq!(stats.total_permissions, 22);
    assert_eq!(stats.role_user_counts["SUPER_ADMIN"], 1);
}

#[tokio::test]
async fn test_role_management_permission_is_enforced() {
    let app = TestApp::new().await;
    let user = app.create_approved_user("plain@example.com").await;
    let admin = app
        .create_user("admin@example.com", GOOD_PASSWORD, ApprovalStatus::Approved, &["ADMIN"])
        .await;
    let roles = &app.state.role_service;

    let err = roles.list_roles(&app.ctx_for(&user)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert_eq!(err.details, vec!["ROLE_MANAGEMENT".to_string()]);

    let listed = roles.list_roles(&app.ctx_for(&admin)).await.unwrap();
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let app = TestApp::new().await;

    let report = app.state.seed().await.unwrap();
    assert_eq!(report.permissions_created, 0);
    assert_eq!(report.roles_created, 0);
    assert!(!report.master_created);
    assert_eq!(app.store.user_count(), 1);

    let master = app.master_ctx().await;
    let super_admin = app.role("SUPER_ADMIN").await;
    let view = app
        .state
        .role_service
        .get_role(&master, super_admin.id)
        .await
        .unwrap();
    assert_eq!(view.permissions.len(), 22);
    assert!(view.role.is_system);
}
