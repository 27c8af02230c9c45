//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sentinel_core::types::RoleId;

use crate::permission::Permission;

/// A named, assignable bundle of permissions.
///
/// Neither the permissions nor the member users are stored here; both are
/// join-table rows in the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Unique role name (e.g. `ADMIN`).
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Seed role: immutable name, non-deletable.
    pub is_system: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a custom (non-system) role.
    pub fn new(name: impl Into<String>, description: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
            description,
            is_system: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a system role.
    pub fn system(name: impl Into<String>, description: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            is_system: true,
            ..Self::new(name, Some(description.into()), now)
        }
    }
}

/// A role together with its permissions, read from the store as one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    /// The assigned role.
    pub role: Role,
    /// Permissions the role grants.
    pub permissions: Vec<Permission>,
}

impl RoleGrant {
    /// Iterates over the granted permission names.
    pub fn permission_names(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(|p| p.name.as_str())
    }
}
