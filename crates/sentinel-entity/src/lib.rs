//! # sentinel-entity
//!
//! Domain entity models for Sentinel. Users, roles, and permissions are flat
//! records keyed by typed ids; none of them holds references to the others.
//! Memberships live in the store's join tables and are surfaced through
//! [`role::RoleGrant`].

pub mod permission;
pub mod role;
pub mod user;

pub use permission::Permission;
pub use role::{Role, RoleGrant};
pub use user::{ApprovalStatus, User, UserSummary};
