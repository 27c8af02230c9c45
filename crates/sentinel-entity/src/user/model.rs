//! User entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use sentinel_core::types::UserId;

use super::approval::ApprovalStatus;

/// Canonical form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Normalized (lowercase) email, unique across users.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Human-readable display name.
    pub name: String,
    /// Department (optional).
    pub department: Option<String>,
    /// Position or title (optional).
    pub position: Option<String>,
    /// Phone number (optional).
    pub phone: Option<String>,
    /// Whether an administrator has left the account enabled.
    pub is_active: bool,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Administrative approval state.
    pub approval_status: ApprovalStatus,
    /// Number of consecutive failed login attempts.
    pub failed_login_attempts: u32,
    /// Account locked until this time (if locked).
    pub locked_until: Option<DateTime<Utc>>,
    /// When the password was last set.
    pub password_changed_at: Option<DateTime<Utc>>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a freshly registered account: active, pending approval, no failures.
    pub fn new(
        email: &str,
        password_hash: String,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            email: normalize_email(email),
            password_hash,
            name: name.into(),
            department: None,
            position: None,
            phone: None,
            is_active: true,
            email_verified: false,
            approval_status: ApprovalStatus::Pending,
            failed_login_attempts: 0,
            locked_until: None,
            password_changed_at: Some(now),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the lock window is still open at `now`.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Time left on the lock, if one is in force at `now`.
    pub fn remaining_lock(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.locked_until
            .filter(|until| *until > now)
            .map(|until| until - now)
    }

    /// Check if the password is older than `max_age` (or was never set).
    pub fn is_password_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.password_changed_at {
            None => true,
            Some(changed_at) => changed_at < now - max_age,
        }
    }

    /// Replaces the password hash and restarts the password-age clock.
    pub fn set_password_hash(&mut self, hash: String, now: DateTime<Utc>) {
        self.password_hash = hash;
        self.password_changed_at = Some(now);
        self.updated_at = now;
    }

    /// Clears the failure counter and any lock.
    pub fn clear_lockout(&mut self) {
        self.failed_login_attempts = 0;
        self.locked_until = None;
    }
}

/// The caller-visible projection of a user returned alongside tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Normalized email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Department (optional).
    pub department: Option<String>,
    /// Position (optional).
    pub position: Option<String>,
    /// Approval state.
    pub approval_status: ApprovalStatus,
    /// Names of the assigned roles, sorted.
    pub roles: Vec<String>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserSummary {
    /// Builds a summary from a user and its assigned role names.
    pub fn from_user(user: &User, mut roles: Vec<String>) -> Self {
        roles.sort();
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            department: user.department.clone(),
            position: user.position.clone(),
            approval_status: user.approval_status,
            roles,
            last_login_at: user.last_login_at,
        }
    }
}
