//! Role and permission administration.

pub mod service;

pub use service::{CreateRoleRequest, RoleService, RoleStatistics, RoleView, UpdateRoleRequest};
