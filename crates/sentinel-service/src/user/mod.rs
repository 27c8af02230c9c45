//! User self-service and admin user management services.

pub mod admin;
pub mod service;

pub use admin::{AdminUserService, UserStatistics};
pub use service::{ChangePasswordRequest, RegisterRequest, UpdateProfileRequest, UserService};

use sentinel_core::result::AppResult;
use sentinel_entity::{User, UserSummary};
use sentinel_store::CredentialStore;

/// Builds the caller-visible summary of a user, including role names.
pub(crate) async fn summarize(store: &dyn CredentialStore, user: &User) -> AppResult<UserSummary> {
    let roles = store
        .user_roles(user.id)
        .await?
        .into_iter()
        .map(|role| role.name)
        .collect();
    Ok(UserSummary::from_user(user, roles))
}

/// Option-field update from a form: blank input clears the field.
pub(crate) fn trimmed_or_none(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
