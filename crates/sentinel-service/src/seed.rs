//! Boot-time seeding of system permissions, system roles, and the master account.
//!
//! Every step checks for an existing record by name (or email) first, so
//! running it again against a populated store changes nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sentinel_auth::{MASTER_ROLE, PasswordHasher, SystemPermission, SystemRole};
use sentinel_core::config::SeedConfig;
use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::PermissionId;
use sentinel_entity::{ApprovalStatus, Permission, Role, User};
use sentinel_store::CredentialStore;

/// What a seeding run created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    /// Permissions inserted.
    pub permissions_created: usize,
    /// Roles inserted.
    pub roles_created: usize,
    /// Whether the master account was inserted.
    pub master_created: bool,
}

/// Seeds the store. Safe to call on every start.
///
/// The master password comes from configuration and is hashed without
/// running the password policy.
pub async fn initialize(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
    config: &SeedConfig,
    now: DateTime<Utc>,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    for permission in SystemPermission::ALL {
        if store
            .find_permission_by_name(permission.as_str())
            .await?
            .is_none()
        {
            store
                .save_permission(&Permission::new(
                    permission.as_str(),
                    permission.description(),
                    permission.category(),
                    permission.action(),
                    true,
                ))
                .await?;
            report.permissions_created += 1;
        }
    }

    for system_role in SystemRole::ALL {
        if store.find_role_by_name(system_role.name()).await?.is_some() {
            debug!(role = system_role.name(), "System role already present");
            continue;
        }

        let role = store
            .save_role(&Role::system(
                system_role.name(),
                system_role.description(),
                now,
            ))
            .await?;

        let mut permission_ids: Vec<PermissionId> = Vec::new();
        for permission in system_role.permissions() {
            if let Some(found) = store.find_permission_by_name(permission.as_str()).await? {
                permission_ids.push(found.id);
            }
        }
        store.set_role_permissions(role.id, &permission_ids).await?;
        report.roles_created += 1;
    }

    if !store.exists_by_email(&config.master_email).await? {
        let master_role = store
            .find_role_by_name(MASTER_ROLE)
            .await?
            .ok_or_else(|| AppError::internal("Master role missing after seeding"))?;

        let hash = hasher.hash_password(&config.master_password)?;
        let mut master = User::new(&config.master_email, hash, config.master_name.clone(), now);
        master.department = Some("IT".to_string());
        master.position = Some(config.master_name.clone());
        master.email_verified = true;
        master.approval_status = ApprovalStatus::Approved;

        let master = store.save_user(&master).await?;
        store.set_user_roles(master.id, &[master_role.id]).await?;
        report.master_created = true;

        info!(user_id = %master.id, email = %master.email, "Master account created");
    }

    info!(
        permissions_created = report.permissions_created,
        roles_created = report.roles_created,
        master_created = report.master_created,
        "Seeding complete"
    );

    Ok(report)
}
