//! Effective permission sets derived from role assignments.

use std::collections::HashSet;
use std::sync::Arc;

use sentinel_core::result::AppResult;
use sentinel_core::types::UserId;
use sentinel_entity::RoleGrant;
use sentinel_store::CredentialStore;

/// Union of the permission names granted by a set of roles.
pub fn union_permissions(grants: &[RoleGrant]) -> HashSet<String> {
    grants
        .iter()
        .flat_map(|grant| grant.permission_names().map(str::to_string))
        .collect()
}

/// Resolves a user's permissions from the store on every call.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    store: Arc<dyn CredentialStore>,
}

impl PermissionResolver {
    /// Creates a resolver over the given store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// All permission names the user holds through any assigned role.
    ///
    /// The role grants are read as one snapshot, so a concurrent change to a
    /// role's permissions is either wholly visible or not at all.
    pub async fn resolve(&self, user_id: UserId) -> AppResult<HashSet<String>> {
        let grants = self.store.role_grants_for_user(user_id).await?;
        Ok(union_permissions(&grants))
    }

    /// Names of the roles assigned to the user, sorted.
    pub async fn resolve_roles(&self, user_id: UserId) -> AppResult<Vec<String>> {
        let mut names: Vec<String> = self
            .store
            .user_roles(user_id)
            .await?
            .into_iter()
            .map(|role| role.name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Whether the user holds `permission`.
    pub async fn has_permission(&self, user_id: UserId, permission: &str) -> AppResult<bool> {
        Ok(self.resolve(user_id).await?.contains(permission))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use sentinel_entity::{Permission, Role, User};
    use sentinel_store::MemoryCredentialStore;

    use super::*;

    async fn permission(store: &MemoryCredentialStore, name: &str) -> Permission {
        store
            .save_permission(&Permission::new(name, format!("{name} access"), "TEST", "USE", false))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_unions_overlapping_roles() {
        let store = Arc::new(MemoryCredentialStore::new());
        let now = Utc::now();
        let read = permission(&store, "DOC_READ").await;
        let write = permission(&store, "DOC_WRITE").await;

        let reader = store.save_role(&Role::new("READER", None, now)).await.unwrap();
        let editor = store.save_role(&Role::new("EDITOR", None, now)).await.unwrap();
        store.set_role_permissions(reader.id, &[read.id]).await.unwrap();
        store
            .set_role_permissions(editor.id, &[read.id, write.id])
            .await
            .unwrap();

        let user = store
            .save_user(&User::new("r@example.com", "h".into(), "R", now))
            .await
            .unwrap();
        store
            .set_user_roles(user.id, &[reader.id, editor.id])
            .await
            .unwrap();

        let resolver = PermissionResolver::new(store.clone());
        let permissions = resolver.resolve(user.id).await.unwrap();
        assert_eq!(permissions.len(), 2);
        assert!(permissions.contains("DOC_READ"));
        assert!(permissions.contains("DOC_WRITE"));
        assert_eq!(
            resolver.resolve_roles(user.id).await.unwrap(),
            vec!["EDITOR".to_string(), "READER".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unassigned_role_changes_do_not_leak() {
        let store = Arc::new(MemoryCredentialStore::new());
        let now = Utc::now();
        let read = permission(&store, "DOC_READ").await;
        let admin = permission(&store, "DOC_ADMIN").await;

        let reader = store.save_role(&Role::new("READER", None, now)).await.unwrap();
        let mut other = store.save_role(&Role::new("OTHER", None, now)).await.unwrap();
        store.set_role_permissions(reader.id, &[read.id]).await.unwrap();

        let user = store
            .save_user(&User::new("r@example.com", "h".into(), "R", now))
            .await
            .unwrap();
        store.set_user_roles(user.id, &[reader.id]).await.unwrap();

        let resolver = PermissionResolver::new(store.clone());
        let before = resolver.resolve(user.id).await.unwrap();

        other.name = "RENAMED".into();
        store.save_role(&other).await.unwrap();
        store
            .set_role_permissions(other.id, &[read.id, admin.id])
            .await
            .unwrap();

        assert_eq!(resolver.resolve(user.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_user_without_roles_has_no_permissions() {
        let store = Arc::new(MemoryCredentialStore::new());
        let resolver = PermissionResolver::new(store);
        assert!(resolver.resolve(UserId::new()).await.unwrap().is_empty());
    }
}
