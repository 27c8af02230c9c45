//! RBAC enforcement: checks a caller's resolved permissions before an
//! operation runs.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_store::CredentialStore;

use super::policies::SystemPermission;
use super::principal::Principal;
use super::resolver::PermissionResolver;
use crate::jwt::JwtDecoder;

/// Name of the permission an operation demands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequiredPermission(String);

impl RequiredPermission {
    /// Requires the permission with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The permission name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequiredPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SystemPermission> for RequiredPermission {
    fn from(permission: SystemPermission) -> Self {
        Self::named(permission.as_str())
    }
}

impl From<&str> for RequiredPermission {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<&RequiredPermission> for RequiredPermission {
    fn from(required: &RequiredPermission) -> Self {
        required.clone()
    }
}

/// A group of operations sharing a default permission.
///
/// Individual operations may override the default; an override wins.
#[derive(Debug, Clone)]
pub struct OperationGroup {
    default: RequiredPermission,
    overrides: HashMap<&'static str, RequiredPermission>,
}

impl OperationGroup {
    /// Creates a group whose operations all require `default`.
    pub fn new(default: impl Into<RequiredPermission>) -> Self {
        Self {
            default: default.into(),
            overrides: HashMap::new(),
        }
    }

    /// Makes `operation` require `permission` instead of the group default.
    pub fn with_override(
        mut self,
        operation: &'static str,
        permission: impl Into<RequiredPermission>,
    ) -> Self {
        self.overrides.insert(operation, permission.into());
        self
    }

    /// The permission `operation` requires.
    pub fn permission_for(&self, operation: &str) -> &RequiredPermission {
        self.overrides.get(operation).unwrap_or(&self.default)
    }
}

/// The enforcement gate placed in front of every protected operation.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    resolver: PermissionResolver,
    decoder: Arc<JwtDecoder>,
    store: Arc<dyn CredentialStore>,
}

impl PermissionGate {
    /// Creates a gate resolving against `store` and accepting tokens from `decoder`.
    pub fn new(store: Arc<dyn CredentialStore>, decoder: Arc<JwtDecoder>) -> Self {
        Self {
            resolver: PermissionResolver::new(store.clone()),
            decoder,
            store,
        }
    }

    /// The resolver used for permission checks.
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Fails with `Unauthenticated` when there is no caller and with
    /// `Forbidden` when the caller lacks `required`.
    pub async fn authorize(
        &self,
        principal: Option<&Principal>,
        required: impl Into<RequiredPermission>,
    ) -> AppResult<Principal> {
        let required = required.into();
        let principal = principal.ok_or_else(AppError::unauthenticated)?;

        let permissions = self.resolver.resolve(principal.user_id).await?;
        if !permissions.contains(required.as_str()) {
            warn!(
                user_id = %principal.user_id,
                permission = %required,
                "Permission denied"
            );
            return Err(AppError::forbidden(required.as_str()));
        }

        Ok(principal.clone())
    }

    /// Runs `op` only after [`authorize`](Self::authorize) succeeds.
    pub async fn guard<F, Fut, T>(
        &self,
        principal: Option<&Principal>,
        required: impl Into<RequiredPermission>,
        op: F,
    ) -> AppResult<T>
    where
        F: FnOnce(Principal) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let principal = self.authorize(principal, required).await?;
        op(principal).await
    }

    /// Turns a bearer access token into a principal.
    ///
    /// The `Bearer ` prefix is optional. The subject must still exist.
    pub async fn principal_from_token(&self, bearer: &str) -> AppResult<Principal> {
        let token = bearer.strip_prefix("Bearer ").unwrap_or(bearer).trim();
        if token.is_empty() {
            return Err(AppError::unauthenticated());
        }

        let claims = self.decoder.decode_access_token(token)?;
        match self.store.find_user_by_id(claims.sub).await? {
            Some(user) => Ok(Principal::new(user.id, user.email)),
            None => Err(AppError::token_invalid("Token subject no longer exists")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;

    use sentinel_core::config::AuthConfig;
    use sentinel_core::{ErrorKind, SystemClock};
    use sentinel_entity::{Permission, Role, User};
    use sentinel_store::MemoryCredentialStore;

    use super::*;
    use crate::jwt::{JwtEncoder, TokenType};

    struct Fixture {
        gate: PermissionGate,
        encoder: JwtEncoder,
        reader: Principal,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryCredentialStore::new());
        let now = Utc::now();
        let permission = store
            .save_permission(&Permission::new(
                "PROFILE_READ",
                "Read profile",
                "PROFILE",
                "READ",
                true,
            ))
            .await
            .unwrap();
        let role = store.save_role(&Role::new("READER", None, now)).await.unwrap();
        store
            .set_role_permissions(role.id, &[permission.id])
            .await
            .unwrap();
        let user = store
            .save_user(&User::new("reader@example.com", "h".into(), "Reader", now))
            .await
            .unwrap();
        store.set_user_roles(user.id, &[role.id]).await.unwrap();

        let config = AuthConfig::default();
        let decoder = Arc::new(JwtDecoder::new(&config, Arc::new(SystemClock)));
        Fixture {
            gate: PermissionGate::new(store, decoder),
            encoder: JwtEncoder::new(&config, Arc::new(SystemClock)),
            reader: Principal::new(user.id, user.email),
        }
    }

    #[tokio::test]
    async fn test_missing_principal_is_unauthenticated() {
        let f = fixture().await;
        let err = f
            .gate
            .authorize(None, SystemPermission::ProfileRead)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_forbidden_names_required_permission() {
        let f = fixture().await;
        assert!(
            f.gate
                .authorize(Some(&f.reader), SystemPermission::ProfileRead)
                .await
                .is_ok()
        );

        let err = f
            .gate
            .authorize(Some(&f.reader), SystemPermission::RoleManagement)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.required_permission(), Some("ROLE_MANAGEMENT"));
    }

    #[tokio::test]
    async fn test_guard_skips_operation_when_denied() {
        let f = fixture().await;
        let ran = AtomicBool::new(false);

        let result = f
            .gate
            .guard(Some(&f.reader), "ROLE_MANAGEMENT", |_| async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert_eq!(result.unwrap_err().kind, ErrorKind::Forbidden);
        assert!(!ran.load(Ordering::SeqCst));

        let value = f
            .gate
            .guard(Some(&f.reader), "PROFILE_READ", |p| async move {
                Ok(p.email)
            })
            .await
            .unwrap();
        assert_eq!(value, "reader@example.com");
    }

    #[test]
    fn test_operation_group_override() {
        let group = OperationGroup::new(SystemPermission::UserManagement)
            .with_override("update_approval_status", SystemPermission::UserApprove);
        assert_eq!(group.permission_for("get_user").as_str(), "USER_MANAGEMENT");
        assert_eq!(
            group.permission_for("update_approval_status").as_str(),
            "USER_APPROVE"
        );
    }

    #[tokio::test]
    async fn test_principal_from_access_token() {
        let f = fixture().await;
        let (token, _) = f
            .encoder
            .generate(f.reader.user_id, &f.reader.email, TokenType::Access)
            .unwrap();

        let principal = f
            .gate
            .principal_from_token(&format!("Bearer {token}"))
            .await
            .unwrap();
        assert_eq!(principal, f.reader);

        let (refresh, _) = f
            .encoder
            .generate(f.reader.user_id, &f.reader.email, TokenType::Refresh)
            .unwrap();
        assert_eq!(
            f.gate.principal_from_token(&refresh).await.unwrap_err().kind,
            ErrorKind::TokenInvalid
        );
    }
}
