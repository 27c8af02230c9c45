//! Admin user management: approval, activation, unlocks, resets and role changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use sentinel_auth::{
    MASTER_ROLE, OperationGroup, PasswordHasher, PasswordValidator, PermissionGate, Principal,
    SystemPermission,
};
use sentinel_core::Clock;
use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::{RoleId, UserId};
use sentinel_entity::{ApprovalStatus, User, UserSummary};
use sentinel_store::CredentialStore;

use super::summarize;
use crate::context::RequestContext;

/// Counts shown on the user administration dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatistics {
    /// Every account.
    pub total_users: usize,
    /// Accounts with approval status APPROVED.
    pub approved_users: usize,
    /// Accounts awaiting approval.
    pub pending_users: usize,
    /// Rejected registrations.
    pub rejected_users: usize,
    /// Accounts per department; accounts without one are not counted.
    pub by_department: BTreeMap<String, usize>,
    /// Holders per role name.
    pub by_role: BTreeMap<String, usize>,
}

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    /// Credential store.
    store: Arc<dyn CredentialStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Enforcement gate.
    gate: Arc<PermissionGate>,
    /// Permission each operation requires.
    operations: OperationGroup,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        gate: Arc<PermissionGate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            hasher,
            validator,
            gate,
            operations: OperationGroup::new(SystemPermission::UserManagement)
                .with_override("update_approval_status", SystemPermission::UserApprove),
            clock,
        }
    }

    /// Gets a single user by ID.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<UserSummary> {
        self.authorize(ctx, "get_user").await?;
        let user = self.find_user(user_id).await?;
        summarize(self.store.as_ref(), &user).await
    }

    /// Approves or rejects a registration.
    pub async fn update_approval_status(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        status: ApprovalStatus,
    ) -> AppResult<UserSummary> {
        let actor = self.authorize(ctx, "update_approval_status").await?;

        let now = self.clock.now();
        let user = self
            .store
            .update_user(
                user_id,
                Box::new(move |user: &mut User| {
                    user.approval_status = status;
                    user.updated_at = now;
                }),
            )
            .await?;

        info!(
            actor_id = %actor.user_id,
            user_id = %user.id,
            status = %status,
            "Approval status updated"
        );

        summarize(self.store.as_ref(), &user).await
    }

    /// Flips the active flag.
    pub async fn toggle_activation(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> AppResult<UserSummary> {
        let actor = self.authorize(ctx, "toggle_activation").await?;

        let now = self.clock.now();
        let user = self
            .store
            .update_user(
                user_id,
                Box::new(move |user: &mut User| {
                    user.is_active = !user.is_active;
                    user.updated_at = now;
                }),
            )
            .await?;

        info!(
            actor_id = %actor.user_id,
            user_id = %user.id,
            is_active = user.is_active,
            "User activation toggled"
        );

        summarize(self.store.as_ref(), &user).await
    }

    /// Clears the failure counter and any lock.
    pub async fn unlock_account(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<()> {
        let actor = self.authorize(ctx, "unlock_account").await?;

        let now = self.clock.now();
        self.store
            .update_user(
                user_id,
                Box::new(move |user: &mut User| {
                    user.clear_lockout();
                    user.updated_at = now;
                }),
            )
            .await?;

        info!(actor_id = %actor.user_id, user_id = %user_id, "Account unlocked");
        Ok(())
    }

    /// Sets a new password without the current one. The policy still applies,
    /// and the lockout state is cleared.
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        new_password: &str,
    ) -> AppResult<()> {
        let actor = self.authorize(ctx, "reset_password").await?;

        self.find_user(user_id).await?;
        self.validator.ensure_valid(new_password)?;

        let hash = self.hasher.hash_password(new_password)?;
        let now = self.clock.now();
        self.store
            .update_user(
                user_id,
                Box::new(move |user: &mut User| {
                    user.set_password_hash(hash, now);
                    user.clear_lockout();
                }),
            )
            .await?;

        info!(actor_id = %actor.user_id, user_id = %user_id, "Password reset by admin");
        Ok(())
    }

    /// Deletes an account. The master account cannot be deleted.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<()> {
        let actor = self.authorize(ctx, "delete_user").await?;

        let user = self.find_user(user_id).await?;
        if self.is_master(user.id).await? {
            return Err(AppError::protected("The master account cannot be deleted"));
        }

        self.store.delete_user(user.id).await?;
        info!(actor_id = %actor.user_id, user_id = %user.id, "User deleted");
        Ok(())
    }

    /// Replaces the roles assigned to a user.
    ///
    /// The master account's roles are fixed, and the master role cannot be
    /// granted through this path.
    pub async fn update_user_roles(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        role_names: &[String],
    ) -> AppResult<UserSummary> {
        let actor = self.authorize(ctx, "update_user_roles").await?;

        let user = self.find_user(user_id).await?;
        if self.is_master(user.id).await? {
            return Err(AppError::protected(
                "The master account's roles cannot be changed",
            ));
        }
        if role_names.iter().any(|name| name == MASTER_ROLE) {
            return Err(AppError::protected(format!(
                "Role '{MASTER_ROLE}' cannot be assigned"
            )));
        }

        let mut role_ids: Vec<RoleId> = Vec::with_capacity(role_names.len());
        for name in role_names {
            let role = self
                .store
                .find_role_by_name(name)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Role '{name}' not found")))?;
            if !role_ids.contains(&role.id) {
                role_ids.push(role.id);
            }
        }

        self.store.set_user_roles(user.id, &role_ids).await?;

        info!(
            actor_id = %actor.user_id,
            user_id = %user.id,
            roles = ?role_names,
            "User roles updated"
        );

        summarize(self.store.as_ref(), &user).await
    }

    /// Accounts awaiting approval.
    pub async fn pending_users(&self, ctx: &RequestContext) -> AppResult<Vec<UserSummary>> {
        self.authorize(ctx, "pending_users").await?;
        self.summaries(|u| u.approval_status == ApprovalStatus::Pending)
            .await
    }

    /// Deactivated accounts.
    pub async fn inactive_users(&self, ctx: &RequestContext) -> AppResult<Vec<UserSummary>> {
        self.authorize(ctx, "inactive_users").await?;
        self.summaries(|u| !u.is_active).await
    }

    /// Account counts by approval status, department, and role.
    pub async fn statistics(&self, ctx: &RequestContext) -> AppResult<UserStatistics> {
        self.authorize(ctx, "statistics").await?;

        let users = self.store.find_all_users().await?;
        let count = |status: ApprovalStatus| {
            users
                .iter()
                .filter(|u| u.approval_status == status)
                .count()
        };

        let mut by_department = BTreeMap::new();
        for department in users.iter().filter_map(|u| u.department.as_ref()) {
            *by_department.entry(department.clone()).or_insert(0) += 1;
        }

        let mut by_role = BTreeMap::new();
        for role in self.store.find_all_roles().await? {
            let holders = self.store.count_users_with_role(role.id).await?;
            by_role.insert(role.name, holders);
        }

        Ok(UserStatistics {
            total_users: users.len(),
            approved_users: count(ApprovalStatus::Approved),
            pending_users: count(ApprovalStatus::Pending),
            rejected_users: count(ApprovalStatus::Rejected),
            by_department,
            by_role,
        })
    }

    async fn authorize(&self, ctx: &RequestContext, operation: &str) -> AppResult<Principal> {
        self.gate
            .authorize(ctx.principal(), self.operations.permission_for(operation))
            .await
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<User> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn is_master(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self
            .store
            .user_roles(user_id)
            .await?
            .iter()
            .any(|role| role.name == MASTER_ROLE))
    }

    async fn summaries(&self, filter: impl Fn(&User) -> bool) -> AppResult<Vec<UserSummary>> {
        let users = self.store.find_all_users().await?;
        let mut summaries = Vec::new();
        for user in users.iter().filter(|u| filter(u)) {
            summaries.push(summarize(self.store.as_ref(), user).await?);
        }
        Ok(summaries)
    }
}
