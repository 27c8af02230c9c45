//! Flat role/permission tables with id-pair join tables.

use std::collections::{HashMap, HashSet};

use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::{PermissionId, RoleId, UserId};
use sentinel_entity::{Permission, Role, RoleGrant};

/// Role, permission, and membership tables.
///
/// No row points at another; "users holding role X" and "permissions of
/// role X" are answered by scanning the join sets.
#[derive(Debug, Default)]
pub(crate) struct RbacTables {
    roles: HashMap<RoleId, Role>,
    role_names: HashMap<String, RoleId>,
    permissions: HashMap<PermissionId, Permission>,
    permission_names: HashMap<String, PermissionId>,
    role_permissions: HashSet<(RoleId, PermissionId)>,
    user_roles: HashSet<(UserId, RoleId)>,
}

impl RbacTables {
    pub(crate) fn role(&self, id: RoleId) -> Option<&Role> {
        self.roles.get(&id)
    }

    pub(crate) fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.role_names.get(name).and_then(|id| self.roles.get(id))
    }

    pub(crate) fn all_roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        roles
    }

    pub(crate) fn upsert_role(&mut self, role: &Role) -> AppResult<Role> {
        if let Some(existing) = self.role_names.get(&role.name) {
            if *existing != role.id {
                return Err(AppError::conflict(format!(
                    "Role '{}' already exists",
                    role.name
                )));
            }
        }

        if let Some(previous) = self.roles.get(&role.id) {
            if previous.name != role.name {
                self.role_names.remove(&previous.name);
            }
        }

        self.role_names.insert(role.name.clone(), role.id);
        self.roles.insert(role.id, role.clone());
        Ok(role.clone())
    }

    pub(crate) fn remove_role(&mut self, id: RoleId) -> AppResult<bool> {
        if self.user_roles.iter().any(|(_, role_id)| *role_id == id) {
            return Err(AppError::conflict(
                "Role is assigned to users and cannot be deleted",
            ));
        }

        match self.roles.remove(&id) {
            Some(role) => {
                self.role_names.remove(&role.name);
                self.role_permissions.retain(|(role_id, _)| *role_id != id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub(crate) fn permission_by_name(&self, name: &str) -> Option<&Permission> {
        self.permission_names
            .get(name)
            .and_then(|id| self.permissions.get(id))
    }

    pub(crate) fn all_permissions(&self) -> Vec<Permission> {
        let mut permissions: Vec<Permission> = self.permissions.values().cloned().collect();
        permissions.sort_by(|a, b| a.category.cmp(&b.category).then(a.name.cmp(&b.name)));
        permissions
    }

    pub(crate) fn upsert_permission(&mut self, permission: &Permission) -> AppResult<Permission> {
        if let Some(existing) = self.permission_names.get(&permission.name) {
            if *existing != permission.id {
                return Err(AppError::conflict(format!(
                    "Permission '{}' already exists",
                    permission.name
                )));
            }
        }

        if let Some(previous) = self.permissions.get(&permission.id) {
            if previous.name != permission.name {
                self.permission_names.remove(&previous.name);
            }
        }

        self.permission_names
            .insert(permission.name.clone(), permission.id);
        self.permissions.insert(permission.id, permission.clone());
        Ok(permission.clone())
    }

    pub(crate) fn replace_role_permissions(
        &mut self,
        role_id: RoleId,
        permissions: &[PermissionId],
    ) -> AppResult<()> {
        if !self.roles.contains_key(&role_id) {
            return Err(AppError::not_found("Role not found"));
        }
        if let Some(missing) = permissions.iter().find(|id| !self.permissions.contains_key(id)) {
            return Err(AppError::not_found(format!("Permission {missing} not found")));
        }

        self.role_permissions.retain(|(id, _)| *id != role_id);
        self.role_permissions
            .extend(permissions.iter().map(|permission_id| (role_id, *permission_id)));
        Ok(())
    }

    pub(crate) fn permissions_of(&self, role_id: RoleId) -> Vec<Permission> {
        let mut permissions: Vec<Permission> = self
            .role_permissions
            .iter()
            .filter(|(id, _)| *id == role_id)
            .filter_map(|(_, permission_id)| self.permissions.get(permission_id).cloned())
            .collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        permissions
    }

    pub(crate) fn replace_user_roles(&mut self, user_id: UserId, roles: &[RoleId]) -> AppResult<()> {
        if let Some(missing) = roles.iter().find(|id| !self.roles.contains_key(id)) {
            return Err(AppError::not_found(format!("Role {missing} not found")));
        }

        self.user_roles.retain(|(id, _)| *id != user_id);
        self.user_roles
            .extend(roles.iter().map(|role_id| (user_id, *role_id)));
        Ok(())
    }

    pub(crate) fn drop_user(&mut self, user_id: UserId) {
        self.user_roles.retain(|(id, _)| *id != user_id);
    }

    pub(crate) fn roles_of(&self, user_id: UserId) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .user_roles
            .iter()
            .filter(|(id, _)| *id == user_id)
            .filter_map(|(_, role_id)| self.roles.get(role_id).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        roles
    }

    pub(crate) fn grants_of(&self, user_id: UserId) -> Vec<RoleGrant> {
        self.roles_of(user_id)
            .into_iter()
            .map(|role| {
                let permissions = self.permissions_of(role.id);
                RoleGrant { role, permissions }
            })
            .collect()
    }

    pub(crate) fn members_of(&self, role_id: RoleId) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .user_roles
            .iter()
            .filter(|(_, id)| *id == role_id)
            .map(|(user_id, _)| *user_id)
            .collect();
        users.sort();
        users
    }
}
