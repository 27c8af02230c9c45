//! User self-service operations: registration, profile and password changes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sentinel_auth::{DEFAULT_ROLE, PasswordHasher, PasswordValidator};
use sentinel_core::Clock;
use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_entity::user::normalize_email;
use sentinel_entity::{User, UserSummary};
use sentinel_store::CredentialStore;

use super::{summarize, trimmed_or_none};
use crate::context::RequestContext;

/// Longest accepted email address.
const MAX_EMAIL_LENGTH: usize = 100;

/// Shortest accepted display name, after trimming.
const MIN_NAME_LENGTH: usize = 2;

/// Self-registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address (unique).
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
    /// Display name.
    pub name: String,
    /// Department (optional).
    #[serde(default)]
    pub department: Option<String>,
    /// Position (optional).
    #[serde(default)]
    pub position: Option<String>,
    /// Phone number (optional).
    #[serde(default)]
    pub phone: Option<String>,
}

/// Data for updating a user's own profile.
///
/// `None` leaves a field unchanged; a blank string clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// New position.
    pub position: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
}

/// Password change form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// The password currently in force.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
    /// Repeated replacement password.
    pub confirm_password: String,
}

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Credential store.
    store: Arc<dyn CredentialStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            hasher,
            validator,
            clock,
        }
    }

    /// Registers a new account awaiting approval, holding the default role.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserSummary> {
        let email = normalize_email(&req.email);
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if email.chars().count() > MAX_EMAIL_LENGTH {
            return Err(AppError::validation(format!(
                "Email must not exceed {MAX_EMAIL_LENGTH} characters"
            )));
        }

        let name = validate_name(&req.name)?;

        if req.password != req.confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }

        if self.store.exists_by_email(&email).await? {
            return Err(AppError::conflict("Email is already in use"));
        }

        self.validator.ensure_valid(&req.password)?;
        let password_hash = self.hasher.hash_password(&req.password)?;

        let mut user = User::new(&email, password_hash, name, self.clock.now());
        user.department = req.department.and_then(trimmed_or_none);
        user.position = req.position.and_then(trimmed_or_none);
        user.phone = req.phone.and_then(trimmed_or_none);

        let user = self.store.save_user(&user).await?;

        match self.store.find_role_by_name(DEFAULT_ROLE).await? {
            Some(role) => self.store.set_user_roles(user.id, &[role.id]).await?,
            None => warn!(role = DEFAULT_ROLE, "Default role missing; user registered without roles"),
        }

        info!(user_id = %user.id, email = %user.email, "User registered, pending approval");

        summarize(self.store.as_ref(), &user).await
    }

    /// Whether no account holds `email`.
    pub async fn is_email_available(&self, email: &str) -> AppResult<bool> {
        Ok(!self.store.exists_by_email(&normalize_email(email)).await?)
    }

    /// Gets the current user's profile.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<UserSummary> {
        let user = self.current_user(ctx).await?;
        summarize(self.store.as_ref(), &user).await
    }

    /// Updates the current user's profile fields.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        req: UpdateProfileRequest,
    ) -> AppResult<UserSummary> {
        let user_id = ctx.user_id()?;
        let name = req.name.as_deref().map(validate_name).transpose()?;
        let department = req.department.map(trimmed_or_none);
        let position = req.position.map(trimmed_or_none);
        let phone = req.phone.map(trimmed_or_none);
        let now = self.clock.now();

        let user = self
            .store
            .update_user(
                user_id,
                Box::new(move |user: &mut User| {
                    if let Some(name) = name {
                        user.name = name;
                    }
                    if let Some(department) = department {
                        user.department = department;
                    }
                    if let Some(position) = position {
                        user.position = position;
                    }
                    if let Some(phone) = phone {
                        user.phone = phone;
                    }
                    user.updated_at = now;
                }),
            )
            .await?;
        info!(user_id = %user.id, "Profile updated");

        summarize(self.store.as_ref(), &user).await
    }

    /// Changes the current user's password.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        req: ChangePasswordRequest,
    ) -> AppResult<()> {
        let user = self.current_user(ctx).await?;

        if req.new_password != req.confirm_password {
            return Err(AppError::validation("New passwords do not match"));
        }
        self.validator
            .validate_not_same(&req.current_password, &req.new_password)?;

        if !self
            .hasher
            .verify_password(&req.current_password, &user.password_hash)?
        {
            return Err(AppError::validation("Current password is incorrect"));
        }

        self.validator.ensure_valid(&req.new_password)?;

        let new_hash = self.hasher.hash_password(&req.new_password)?;
        let now = self.clock.now();
        self.store
            .update_user(
                user.id,
                Box::new(move |user: &mut User| user.set_password_hash(new_hash, now)),
            )
            .await?;

        info!(user_id = %user.id, "Password changed");

        Ok(())
    }

    async fn current_user(&self, ctx: &RequestContext) -> AppResult<User> {
        let user_id = ctx.user_id()?;
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

/// Trims a display name and enforces the minimum length.
pub(crate) fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Name must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}
