//! Pre-verification checks on an account's state.

use chrono::{DateTime, Duration, Utc};

use sentinel_core::config::AuthConfig;
use sentinel_core::error::AppError;
use sentinel_entity::{ApprovalStatus, User};

/// Decides whether a login attempt may proceed to password comparison.
#[derive(Debug, Clone, Copy)]
pub struct AccountGuard {
    password_max_age: Duration,
}

impl AccountGuard {
    /// Creates a guard that refuses passwords older than `password_max_age`.
    pub fn new(password_max_age: Duration) -> Self {
        Self { password_max_age }
    }

    /// Creates a guard from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(Duration::days(config.password_max_age_days as i64))
    }

    /// Runs the gates in order (active, approval, lock, password age)
    /// and fails with the first one that does not pass.
    pub fn check(&self, user: &User, now: DateTime<Utc>) -> Result<(), AppError> {
        if !user.is_active {
            return Err(AppError::account_disabled(
                "Account is deactivated. Contact an administrator.",
            ));
        }

        match user.approval_status {
            ApprovalStatus::Approved => {}
            ApprovalStatus::Pending => {
                return Err(AppError::account_disabled(
                    "Account is pending approval. Please wait for an administrator.",
                ));
            }
            ApprovalStatus::Rejected => {
                return Err(AppError::account_disabled(
                    "Account registration was rejected. Contact an administrator.",
                ));
            }
        }

        if let Some(remaining) = user.remaining_lock(now) {
            return Err(AppError::account_locked(remaining));
        }

        if user.is_password_expired(now, self.password_max_age) {
            return Err(AppError::password_expired());
        }

        Ok(())
    }
}
