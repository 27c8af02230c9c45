//! Built-in permission and role definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role held by the master account.
pub const MASTER_ROLE: &str = "SUPER_ADMIN";

/// Role assigned to every newly registered user.
pub const DEFAULT_ROLE: &str = "USER";

/// A permission shipped with the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemPermission {
    // System
    /// Unrestricted access.
    SuperAdmin,
    /// Access to the administration area.
    AdminAccess,
    /// Change system settings.
    SystemConfig,

    // User management
    /// Administer user accounts.
    UserManagement,
    /// Create users.
    UserCreate,
    /// Read user details.
    UserRead,
    /// Update user details.
    UserUpdate,
    /// Delete users.
    UserDelete,
    /// Approve or reject registrations.
    UserApprove,

    // Roles and permissions
    /// Administer roles.
    RoleManagement,
    /// Administer permissions.
    PermissionManagement,

    // Files
    /// Upload files.
    FileUpload,
    /// Download files.
    FileDownload,
    /// Administer files.
    FileManagement,
    /// Delete files.
    FileDelete,

    // Notifications
    /// Read notifications.
    NotificationRead,
    /// Send notifications.
    NotificationSend,
    /// Administer notifications.
    NotificationManagement,

    // Self-service
    /// Read one's own profile.
    ProfileRead,
    /// Update one's own profile.
    ProfileUpdate,
    /// Change one's own password.
    PasswordChange,
    /// View the dashboard.
    DashboardView,
}

impl SystemPermission {
    /// Every system permission, in catalog order.
    pub const ALL: [Self; 22] = [
        Self::SuperAdmin,
        Self::AdminAccess,
        Self::SystemConfig,
        Self::UserManagement,
        Self::UserCreate,
        Self::UserRead,
        Self::UserUpdate,
        Self::UserDelete,
        Self::UserApprove,
        Self::RoleManagement,
        Self::PermissionManagement,
        Self::FileUpload,
        Self::FileDownload,
        Self::FileManagement,
        Self::FileDelete,
        Self::NotificationRead,
        Self::NotificationSend,
        Self::NotificationManagement,
        Self::ProfileRead,
        Self::ProfileUpdate,
        Self::PasswordChange,
        Self::DashboardView,
    ];

    /// Stored permission name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::AdminAccess => "ADMIN_ACCESS",
            Self::SystemConfig => "SYSTEM_CONFIG",
            Self::UserManagement => "USER_MANAGEMENT",
            Self::UserCreate => "USER_CREATE",
            Self::UserRead => "USER_READ",
            Self::UserUpdate => "USER_UPDATE",
            Self::UserDelete => "USER_DELETE",
            Self::UserApprove => "USER_APPROVE",
            Self::RoleManagement => "ROLE_MANAGEMENT",
            Self::PermissionManagement => "PERMISSION_MANAGEMENT",
            Self::FileUpload => "FILE_UPLOAD",
            Self::FileDownload => "FILE_DOWNLOAD",
            Self::FileManagement => "FILE_MANAGEMENT",
            Self::FileDelete => "FILE_DELETE",
            Self::NotificationRead => "NOTIFICATION_READ",
            Self::NotificationSend => "NOTIFICATION_SEND",
            Self::NotificationManagement => "NOTIFICATION_MANAGEMENT",
            Self::ProfileRead => "PROFILE_READ",
            Self::ProfileUpdate => "PROFILE_UPDATE",
            Self::PasswordChange => "PASSWORD_CHANGE",
            Self::DashboardView => "DASHBOARD_VIEW",
        }
    }

    /// Grouping used when listing permissions by category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::SuperAdmin | Self::SystemConfig => "SYSTEM",
            Self::AdminAccess => "ADMIN",
            Self::UserManagement
            | Self::UserCreate
            | Self::UserRead
            | Self::UserUpdate
            | Self::UserDelete
            | Self::UserApprove => "USER",
            Self::RoleManagement => "ROLE",
            Self::PermissionManagement => "PERMISSION",
            Self::FileUpload | Self::FileDownload | Self::FileManagement | Self::FileDelete => {
                "FILE"
            }
            Self::NotificationRead | Self::NotificationSend | Self::NotificationManagement => {
                "NOTIFICATION"
            }
            Self::ProfileRead | Self::ProfileUpdate => "PROFILE",
            Self::PasswordChange => "PASSWORD",
            Self::DashboardView => "DASHBOARD",
        }
    }

    /// Verb part of the permission.
    pub fn action(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "ALL",
            Self::AdminAccess => "ACCESS",
            Self::SystemConfig => "CONFIG",
            Self::UserManagement
            | Self::RoleManagement
            | Self::PermissionManagement
            | Self::FileManagement
            | Self::NotificationManagement => "MANAGEMENT",
            Self::UserCreate => "CREATE",
            Self::UserRead | Self::NotificationRead | Self::ProfileRead => "READ",
            Self::UserUpdate | Self::ProfileUpdate => "UPDATE",
            Self::UserDelete | Self::FileDelete => "DELETE",
            Self::UserApprove => "APPROVE",
            Self::FileUpload => "UPLOAD",
            Self::FileDownload => "DOWNLOAD",
            Self::NotificationSend => "SEND",
            Self::PasswordChange => "CHANGE",
            Self::DashboardView => "VIEW",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super administrator",
            Self::AdminAccess => "Access the administration area",
            Self::SystemConfig => "Change system configuration",
            Self::UserManagement => "Manage users",
            Self::UserCreate => "Create users",
            Self::UserRead => "View users",
            Self::UserUpdate => "Update users",
            Self::UserDelete => "Delete users",
            Self::UserApprove => "Approve user registrations",
            Self::RoleManagement => "Manage roles",
            Self::PermissionManagement => "Manage permissions",
            Self::FileUpload => "Upload files",
            Self::FileDownload => "Download files",
            Self::FileManagement => "Manage files",
            Self::FileDelete => "Delete files",
            Self::NotificationRead => "Read notifications",
            Self::NotificationSend => "Send notifications",
            Self::NotificationManagement => "Manage notifications",
            Self::ProfileRead => "View own profile",
            Self::ProfileUpdate => "Update own profile",
            Self::PasswordChange => "Change own password",
            Self::DashboardView => "View the dashboard",
        }
    }
}

impl fmt::Display for SystemPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role shipped with the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemRole {
    /// Holds every permission; the master account's role.
    SuperAdmin,
    /// Day-to-day administration.
    Admin,
    /// Default role for registered users.
    User,
}

impl SystemRole {
    /// Every system role, seeded in this order.
    pub const ALL: [Self; 3] = [Self::SuperAdmin, Self::Admin, Self::User];

    /// Stored role name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SuperAdmin => MASTER_ROLE,
            Self::Admin => "ADMIN",
            Self::User => DEFAULT_ROLE,
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super administrator",
            Self::Admin => "Administrator",
            Self::User => "Regular user",
        }
    }

    /// Permissions granted to the role when it is first seeded.
    pub fn permissions(&self) -> Vec<SystemPermission> {
        use SystemPermission::*;

        match self {
            Self::SuperAdmin => SystemPermission::ALL.to_vec(),
            Self::Admin => vec![
                AdminAccess,
                UserManagement,
                UserCreate,
                UserRead,
                UserUpdate,
                UserApprove,
                RoleManagement,
                FileManagement,
                NotificationManagement,
                NotificationSend,
                ProfileRead,
                ProfileUpdate,
                PasswordChange,
                DashboardView,
            ],
            Self::User => vec![
                FileUpload,
                FileDownload,
                NotificationRead,
                ProfileRead,
                ProfileUpdate,
                PasswordChange,
                DashboardView,
            ],
        }
    }
}
