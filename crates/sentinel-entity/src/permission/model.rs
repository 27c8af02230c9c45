//! Permission entity model.

use serde::{Deserialize, Serialize};

use sentinel_core::types::PermissionId;

/// An atomic named capability (e.g. `USER_MANAGEMENT`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: PermissionId,
    /// Unique permission name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Grouping used for display (e.g. `USER`, `FILE`).
    pub category: String,
    /// The action within the category (e.g. `CREATE`).
    pub action: String,
    /// Seed permission rather than a custom one.
    pub is_system: bool,
}

impl Permission {
    /// Creates a permission record.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        action: impl Into<String>,
        is_system: bool,
    ) -> Self {
        Self {
            id: PermissionId::new(),
            name: name.into(),
            description: Some(description.into()),
            category: category.into(),
            action: action.into(),
            is_system,
        }
    }
}
