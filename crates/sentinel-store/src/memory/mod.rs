//! In-memory credential store for single-node deployments and tests.

mod tables;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::RwLock;
use tracing::debug;

use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::{PermissionId, RoleId, UserId};
use sentinel_entity::user::normalize_email;
use sentinel_entity::{Permission, Role, RoleGrant, User};

use crate::repository::{CredentialStore, LockoutPolicy, LoginAdmission, UserUpdate};

use self::tables::RbacTables;

/// A stored user plus the password comparisons currently admitted for it.
#[derive(Debug, Clone)]
struct UserRow {
    user: User,
    attempts_in_flight: u32,
}

impl UserRow {
    fn new(user: User) -> Self {
        Self {
            user,
            attempts_in_flight: 0,
        }
    }

    fn release_attempt(&mut self) {
        self.attempts_in_flight = self.attempts_in_flight.saturating_sub(1);
    }
}

/// In-memory [`CredentialStore`].
///
/// User rows live in a `DashMap`; holding an entry guard serializes every
/// read-modify-write on that row, which is what makes the lockout counter
/// and the attempt slots atomic. Role, permission, and membership tables sit
/// behind one `RwLock` so readers always see a whole snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    users: Arc<DashMap<UserId, UserRow>>,
    emails: Arc<DashMap<String, UserId>>,
    rbac: Arc<RwLock<RbacTables>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn user_not_found() -> AppError {
        AppError::not_found("User not found")
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|row| row.user.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = normalize_email(email);
        let Some(id) = self.emails.get(&email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_user_by_id(id).await
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.emails.contains_key(&normalize_email(email)))
    }

    async fn find_all_users(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|row| row.user.clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        Ok(users)
    }

    async fn save_user(&self, user: &User) -> AppResult<User> {
        let mut user = user.clone();
        user.email = normalize_email(&user.email);

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(entry) if *entry.get() != user.id => {
                return Err(AppError::conflict(format!(
                    "Email '{}' is already in use",
                    user.email
                )));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(entry) => {
                entry.insert(user.id);
            }
        }

        // Replacing a row keeps the attempts already admitted against it.
        let previous_email = match self.users.entry(user.id) {
            Entry::Occupied(mut entry) => {
                let row = entry.get_mut();
                let previous = std::mem::replace(&mut row.user, user.clone());
                Some(previous.email).filter(|email| *email != user.email)
            }
            Entry::Vacant(entry) => {
                entry.insert(UserRow::new(user.clone()));
                None
            }
        };

        if let Some(old) = previous_email {
            self.emails.remove_if(&old, |_, id| *id == user.id);
        }

        debug!(user_id = %user.id, "User saved");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> AppResult<User> {
        let mut row = self.users.get_mut(&id).ok_or_else(Self::user_not_found)?;

        let mut updated = row.user.clone();
        update(&mut updated);
        if updated.id != row.user.id || updated.email != row.user.email {
            return Err(AppError::internal(
                "User update may not change the id or email",
            ));
        }
        row.user = updated;

        debug!(user_id = %id, "User updated");
        Ok(row.user.clone())
    }

    async fn delete_user(&self, id: UserId) -> AppResult<bool> {
        let Some((_, row)) = self.users.remove(&id) else {
            return Ok(false);
        };
        self.emails.remove_if(&row.user.email, |_, owner| *owner == id);
        self.rbac.write().await.drop_user(id);
        Ok(true)
    }

    async fn begin_login_attempt(
        &self,
        id: UserId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<LoginAdmission> {
        let mut row = self.users.get_mut(&id).ok_or_else(Self::user_not_found)?;

        if row.user.locked_until.is_some_and(|until| until <= now) {
            row.user.clear_lockout();
            row.user.updated_at = now;
        }

        if let Some(remaining) = row.user.remaining_lock(now) {
            return Ok(LoginAdmission::Refused {
                user: row.user.clone(),
                retry_after: remaining,
            });
        }

        let taken = row.user.failed_login_attempts + row.attempts_in_flight;
        if taken >= policy.max_failed_attempts.max(1) {
            return Ok(LoginAdmission::Refused {
                user: row.user.clone(),
                retry_after: policy.lockout_duration,
            });
        }

        row.attempts_in_flight += 1;
        Ok(LoginAdmission::Admitted(row.user.clone()))
    }

    async fn abandon_login_attempt(&self, id: UserId) -> AppResult<()> {
        let mut row = self.users.get_mut(&id).ok_or_else(Self::user_not_found)?;
        row.release_attempt();
        Ok(())
    }

    async fn record_failed_login(
        &self,
        id: UserId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<User> {
        let mut row = self.users.get_mut(&id).ok_or_else(Self::user_not_found)?;
        row.release_attempt();

        let user = &mut row.user;
        user.failed_login_attempts = user.failed_login_attempts.saturating_add(1);
        if user.failed_login_attempts >= policy.max_failed_attempts {
            user.locked_until = Some(now + policy.lockout_duration);
        }
        user.updated_at = now;

        Ok(user.clone())
    }

    async fn record_successful_login(&self, id: UserId, now: DateTime<Utc>) -> AppResult<User> {
        let mut row = self.users.get_mut(&id).ok_or_else(Self::user_not_found)?;
        row.release_attempt();

        let user = &mut row.user;
        if let Some(remaining) = user.remaining_lock(now) {
            return Err(AppError::account_locked(remaining));
        }

        user.clear_lockout();
        user.last_login_at = Some(now);
        user.updated_at = now;

        Ok(user.clone())
    }

    async fn find_role_by_id(&self, id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.rbac.read().await.role(id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self.rbac.read().await.role_by_name(name).cloned())
    }

    async fn find_all_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.rbac.read().await.all_roles())
    }

    async fn save_role(&self, role: &Role) -> AppResult<Role> {
        self.rbac.write().await.upsert_role(role)
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        self.rbac.write().await.remove_role(id)
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self.rbac.read().await.permission_by_name(name).cloned())
    }

    async fn find_all_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.rbac.read().await.all_permissions())
    }

    async fn save_permission(&self, permission: &Permission) -> AppResult<Permission> {
        self.rbac.write().await.upsert_permission(permission)
    }

    async fn set_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[PermissionId],
    ) -> AppResult<()> {
        self.rbac
            .write()
            .await
            .replace_role_permissions(role_id, permissions)
    }

    async fn role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        Ok(self.rbac.read().await.permissions_of(role_id))
    }

    async fn set_user_roles(&self, user_id: UserId, roles: &[RoleId]) -> AppResult<()> {
        // `delete_user` removes the row before it takes this lock, so the
        // check must happen while the lock is held.
        let mut rbac = self.rbac.write().await;
        if !self.users.contains_key(&user_id) {
            return Err(Self::user_not_found());
        }
        rbac.replace_user_roles(user_id, roles)
    }

    async fn user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        Ok(self.rbac.read().await.roles_of(user_id))
    }

    async fn role_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleGrant>> {
        Ok(self.rbac.read().await.grants_of(user_id))
    }

    async fn users_with_role(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        Ok(self.rbac.read().await.members_of(role_id))
    }
}
