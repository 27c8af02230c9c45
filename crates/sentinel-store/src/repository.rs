//! Credential store contract.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use sentinel_core::result::AppResult;
use sentinel_core::types::{PermissionId, RoleId, UserId};
use sentinel_entity::{Permission, Role, RoleGrant, User};

/// Threshold and window applied when a failed login is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures that engage the lock.
    pub max_failed_attempts: u32,
    /// How long the lock lasts, measured from the failure that engaged it.
    pub lockout_duration: Duration,
}

/// Whether a login attempt may go on to compare the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAdmission {
    /// The attempt holds one of the threshold's slots until its outcome is
    /// recorded or it is abandoned.
    Admitted(User),
    /// A lock is in force, or every slot left before the threshold is taken
    /// by attempts still in flight.
    Refused {
        /// The user as stored.
        user: User,
        /// How long the caller should wait before trying again.
        retry_after: Duration,
    },
}

/// Field-scoped edit applied to a stored user under its row lock.
pub type UserUpdate = Box<dyn FnOnce(&mut User) + Send>;

/// Persistence boundary for users, roles, permissions, and their memberships.
///
/// Implementations must make [`begin_login_attempt`](Self::begin_login_attempt),
/// [`record_failed_login`](Self::record_failed_login),
/// [`record_successful_login`](Self::record_successful_login) and
/// [`update_user`](Self::update_user) atomic read-modify-write operations on
/// the user row, and must serve
/// [`role_grants_for_user`](Self::role_grants_for_user) from a single
/// consistent snapshot of the role/permission tables.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    // ── Users ────────────────────────────────────────────────────

    /// Find a user by primary key.
    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by email (normalized before lookup).
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Whether any user holds this email.
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// List every user.
    async fn find_all_users(&self) -> AppResult<Vec<User>>;

    /// Insert or replace a user. Fails with `Conflict` when another user
    /// already holds the email.
    async fn save_user(&self, user: &User) -> AppResult<User>;

    /// Apply `update` to the stored row in place, so fields the update does
    /// not touch (the lockout counters in particular) are never written from
    /// a stale copy. The update must not change the id or the email.
    async fn update_user(&self, id: UserId, update: UserUpdate) -> AppResult<User>;

    /// Delete a user and its role memberships. Returns `true` if deleted.
    async fn delete_user(&self, id: UserId) -> AppResult<bool>;

    /// Reserve a slot for one password comparison. Refused while a lock is in
    /// force or while recorded failures plus attempts in flight already reach
    /// the threshold. An expired lock is cleared first, starting a fresh
    /// window.
    async fn begin_login_attempt(
        &self,
        id: UserId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<LoginAdmission>;

    /// Release a slot taken by [`begin_login_attempt`](Self::begin_login_attempt)
    /// without recording an outcome.
    async fn abandon_login_attempt(&self, id: UserId) -> AppResult<()>;

    /// Atomically increment the failure counter, engage the lock when the
    /// threshold is reached, and persist. Releases the caller's attempt slot,
    /// if any. Returns the updated user.
    async fn record_failed_login(
        &self,
        id: UserId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<User>;

    /// Atomically reset the failure counter, clear any lock, and stamp the
    /// last login. Releases the caller's attempt slot, if any. Fails with
    /// `AccountDisabled` and leaves the row untouched while a lock is in
    /// force at `now`. Returns the updated user.
    async fn record_successful_login(&self, id: UserId, now: DateTime<Utc>) -> AppResult<User>;

    // ── Roles ────────────────────────────────────────────────────

    /// Find a role by primary key.
    async fn find_role_by_id(&self, id: RoleId) -> AppResult<Option<Role>>;

    /// Find a role by its unique name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// List every role.
    async fn find_all_roles(&self) -> AppResult<Vec<Role>>;

    /// Insert or replace a role. Fails with `Conflict` on a duplicate name.
    async fn save_role(&self, role: &Role) -> AppResult<Role>;

    /// Delete a role and its permission rows. Fails with `Conflict` while any
    /// user still holds it. Returns `true` if deleted.
    async fn delete_role(&self, id: RoleId) -> AppResult<bool>;

    // ── Permissions ──────────────────────────────────────────────

    /// Find a permission by its unique name.
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    /// List every permission.
    async fn find_all_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Insert or replace a permission. Fails with `Conflict` on a duplicate name.
    async fn save_permission(&self, permission: &Permission) -> AppResult<Permission>;

    // ── Memberships ──────────────────────────────────────────────

    /// Replace the permission set of a role in one step.
    async fn set_role_permissions(&self, role_id: RoleId, permissions: &[PermissionId])
    -> AppResult<()>;

    /// Permissions granted by a role.
    async fn role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>>;

    /// Replace the role set of a user in one step.
    async fn set_user_roles(&self, user_id: UserId, roles: &[RoleId]) -> AppResult<()>;

    /// Roles assigned to a user.
    async fn user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>>;

    /// Every role assigned to a user together with its permissions.
    async fn role_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleGrant>>;

    /// Users holding a role, found by scanning the membership table.
    async fn users_with_role(&self, role_id: RoleId) -> AppResult<Vec<UserId>>;

    /// Number of users holding a role.
    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<usize> {
        Ok(self.users_with_role(role_id).await?.len())
    }
}
