//! Shared value types: typed identifiers and caller-visible response bodies.

pub mod id;
pub mod response;

pub use id::{PermissionId, RoleId, UserId};
pub use response::ErrorResponse;
