//! Role CRUD, permission listings, and role statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use sentinel_auth::{OperationGroup, PermissionGate, Principal, SystemPermission};
use sentinel_core::Clock;
use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::{PermissionId, RoleId};
use sentinel_entity::{Permission, Role, UserSummary};
use sentinel_store::CredentialStore;

use crate::context::RequestContext;
use crate::user::summarize;

/// Refusal shared by every mutation of a system role.
const SYSTEM_ROLE_MESSAGE: &str = "System roles cannot be modified or deleted";

/// A role with its permission names and holder count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleView {
    /// The role record.
    pub role: Role,
    /// Names of the granted permissions, sorted.
    pub permissions: Vec<String>,
    /// Number of users holding the role.
    pub user_count: usize,
}

/// Data for creating a custom role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    /// Unique role name.
    pub name: String,
    /// Description (optional).
    #[serde(default)]
    pub description: Option<String>,
    /// Permissions to grant.
    #[serde(default)]
    pub permission_names: Vec<String>,
}

/// Data for updating a custom role. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement permission set.
    pub permission_names: Option<Vec<String>>,
}

/// Role and permission counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStatistics {
    /// Number of roles.
    pub total_roles: usize,
    /// Number of permissions.
    pub total_permissions: usize,
    /// Holders per role name.
    pub role_user_counts: BTreeMap<String, usize>,
}

/// Handles role administration.
#[derive(Debug, Clone)]
pub struct RoleService {
    /// Credential store.
    store: Arc<dyn CredentialStore>,
    /// Enforcement gate.
    gate: Arc<PermissionGate>,
    /// Permission each operation requires.
    operations: OperationGroup,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        gate: Arc<PermissionGate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            gate,
            operations: OperationGroup::new(SystemPermission::RoleManagement),
            clock,
        }
    }

    /// Lists every role.
    pub async fn list_roles(&self, ctx: &RequestContext) -> AppResult<Vec<RoleView>> {
        self.authorize(ctx, "list_roles").await?;

        let mut views = Vec::new();
        for role in self.store.find_all_roles().await? {
            views.push(self.view(role).await?);
        }
        Ok(views)
    }

    /// Gets a role by ID.
    pub async fn get_role(&self, ctx: &RequestContext, role_id: RoleId) -> AppResult<RoleView> {
        self.authorize(ctx, "get_role").await?;
        let role = self.find_role(role_id).await?;
        self.view(role).await
    }

    /// Creates a custom role.
    pub async fn create_role(
        &self,
        ctx: &RequestContext,
        req: CreateRoleRequest,
    ) -> AppResult<RoleView> {
        let actor = self.authorize(ctx, "create_role").await?;

        let name = validate_role_name(&req.name)?;
        if self.store.find_role_by_name(&name).await?.is_some() {
            return Err(AppError::conflict(format!("Role '{name}' already exists")));
        }
        let permission_ids = self.permission_ids(&req.permission_names).await?;

        let role = Role::new(name, req.description, self.clock.now());
        let role = self.store.save_role(&role).await?;
        self.store
            .set_role_permissions(role.id, &permission_ids)
            .await?;

        info!(actor_id = %actor.user_id, role = %role.name, "Role created");

        self.view(role).await
    }

    /// Updates a custom role. System roles are refused.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        role_id: RoleId,
        req: UpdateRoleRequest,
    ) -> AppResult<RoleView> {
        let actor = self.authorize(ctx, "update_role").await?;

        let mut role = self.find_role(role_id).await?;
        if role.is_system {
            return Err(AppError::protected(SYSTEM_ROLE_MESSAGE));
        }

        if let Some(name) = req.name {
            let name = validate_role_name(&name)?;
            if name != role.name && self.store.find_role_by_name(&name).await?.is_some() {
                return Err(AppError::conflict(format!("Role '{name}' already exists")));
            }
            role.name = name;
        }
        if let Some(description) = req.description {
            role.description = Some(description);
        }
        let permission_ids = match req.permission_names {
            Some(names) => Some(self.permission_ids(&names).await?),
            None => None,
        };

        role.updated_at = self.clock.now();
        let role = self.store.save_role(&role).await?;
        if let Some(ids) = permission_ids {
            self.store.set_role_permissions(role.id, &ids).await?;
        }

        info!(actor_id = %actor.user_id, role = %role.name, "Role updated");

        self.view(role).await
    }

    /// Deletes a custom role that no user holds. System roles are refused.
    pub async fn delete_role(&self, ctx: &RequestContext, role_id: RoleId) -> AppResult<()> {
        let actor = self.authorize(ctx, "delete_role").await?;

        let role = self.find_role(role_id).await?;
        if role.is_system {
            return Err(AppError::protected(SYSTEM_ROLE_MESSAGE));
        }
        if self.store.count_users_with_role(role.id).await? > 0 {
            return Err(AppError::conflict(
                "Role is assigned to users and cannot be deleted",
            ));
        }

        self.store.delete_role(role.id).await?;
        info!(actor_id = %actor.user_id, role = %role.name, "Role deleted");
        Ok(())
    }

    /// Lists every permission.
    pub async fn list_permissions(&self, ctx: &RequestContext) -> AppResult<Vec<Permission>> {
        self.authorize(ctx, "list_permissions").await?;
        self.store.find_all_permissions().await
    }

    /// Permissions grouped by category.
    pub async fn permissions_by_category(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<BTreeMap<String, Vec<Permission>>> {
        self.authorize(ctx, "permissions_by_category").await?;

        let mut grouped: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
        for permission in self.store.find_all_permissions().await? {
            grouped
                .entry(permission.category.clone())
                .or_default()
                .push(permission);
        }
        Ok(grouped)
    }

    /// Users holding the named role.
    pub async fn users_with_role(
        &self,
        ctx: &RequestContext,
        role_name: &str,
    ) -> AppResult<Vec<UserSummary>> {
        self.authorize(ctx, "users_with_role").await?;

        let role = self
            .store
            .find_role_by_name(role_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role '{role_name}' not found")))?;

        let mut users = Vec::new();
        for user_id in self.store.users_with_role(role.id).await? {
            if let Some(user) = self.store.find_user_by_id(user_id).await? {
                users.push(summarize(self.store.as_ref(), &user).await?);
            }
        }
        Ok(users)
    }

    /// Role and permission counts.
    pub async fn statistics(&self, ctx: &RequestContext) -> AppResult<RoleStatistics> {
        self.authorize(ctx, "statistics").await?;

        let roles = self.store.find_all_roles().await?;
        let mut role_user_counts = BTreeMap::new();
        for role in &roles {
            let holders = self.store.count_users_with_role(role.id).await?;
            role_user_counts.insert(role.name.clone(), holders);
        }

        Ok(RoleStatistics {
            total_roles: roles.len(),
            total_permissions: self.store.find_all_permissions().await?.len(),
            role_user_counts,
        })
    }

    async fn authorize(&self, ctx: &RequestContext, operation: &str) -> AppResult<Principal> {
        self.gate
            .authorize(ctx.principal(), self.operations.permission_for(operation))
            .await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.store
            .find_role_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    async fn permission_ids(&self, names: &[String]) -> AppResult<Vec<PermissionId>> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let permission = self
                .store
                .find_permission_by_name(name)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Permission '{name}' not found")))?;
            if !ids.contains(&permission.id) {
                ids.push(permission.id);
            }
        }
        Ok(ids)
    }

    async fn view(&self, role: Role) -> AppResult<RoleView> {
        let permissions = self
            .store
            .role_permissions(role.id)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        let user_count = self.store.count_users_with_role(role.id).await?;
        Ok(RoleView {
            role,
            permissions,
            user_count,
        })
    }
}

fn validate_role_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Role name is required"));
    }
    Ok(name.to_string())
}
