//! Failed-login counting and time-boxed account locks.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use sentinel_core::config::AuthConfig;
use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::UserId;
use sentinel_entity::User;
use sentinel_store::{CredentialStore, LockoutPolicy, LoginAdmission};

/// Records login outcomes against the store's atomic counters.
#[derive(Debug, Clone)]
pub struct LockoutTracker {
    store: Arc<dyn CredentialStore>,
    policy: LockoutPolicy,
}

impl LockoutTracker {
    /// Creates a tracker with an explicit policy.
    pub fn new(store: Arc<dyn CredentialStore>, policy: LockoutPolicy) -> Self {
        Self { store, policy }
    }

    /// Creates a tracker using the thresholds in auth configuration.
    pub fn from_config(store: Arc<dyn CredentialStore>, config: &AuthConfig) -> Self {
        Self::new(
            store,
            LockoutPolicy {
                max_failed_attempts: config.max_failed_attempts,
                lockout_duration: Duration::minutes(config.lockout_duration_minutes as i64),
            },
        )
    }

    /// The policy in force.
    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Reserves one password comparison for the account.
    ///
    /// At most `max_failed_attempts` comparisons can be outstanding or
    /// recorded as failures before the lock engages; anything beyond that is
    /// refused with the lock message.
    pub async fn admit(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<User> {
        match self
            .store
            .begin_login_attempt(user_id, &self.policy, now)
            .await?
        {
            LoginAdmission::Admitted(user) => Ok(user),
            LoginAdmission::Refused { user, retry_after } => {
                warn!(
                    user_id = %user.id,
                    attempts = user.failed_login_attempts,
                    "Login refused: attempt limit reached"
                );
                Err(AppError::account_locked(retry_after))
            }
        }
    }

    /// Gives back a reserved comparison that produced no outcome.
    pub async fn abandon(&self, user_id: UserId) {
        if let Err(e) = self.store.abandon_login_attempt(user_id).await {
            error!(user_id = %user_id, error = %e, "Failed to release login attempt");
        }
    }

    /// Counts a wrong password against the account.
    ///
    /// Never fails: a store fault is logged and the caller keeps reporting
    /// invalid credentials. Returns the updated user when the write succeeded.
    pub async fn record_failure(&self, user_id: UserId, now: DateTime<Utc>) -> Option<User> {
        match self
            .store
            .record_failed_login(user_id, &self.policy, now)
            .await
        {
            Ok(user) => {
                if let Some(locked_until) = user.locked_until.filter(|until| *until > now) {
                    warn!(
                        user_id = %user.id,
                        email = %user.email,
                        attempts = user.failed_login_attempts,
                        locked_until = %locked_until,
                        "User account locked due to failed login attempts"
                    );
                } else {
                    warn!(
                        user_id = %user.id,
                        attempts = user.failed_login_attempts,
                        "Failed login attempt"
                    );
                }
                Some(user)
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to record failed login attempt");
                None
            }
        }
    }

    /// Resets the counter, clears any lock, and stamps the last login.
    /// Fails with `AccountDisabled` if a lock is in force at `now`.
    pub async fn record_success(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<User> {
        let user = self.store.record_successful_login(user_id, now).await?;
        info!(user_id = %user.id, "Login counters reset");
        Ok(user)
    }
}
