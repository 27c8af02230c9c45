//! Role-based access control: permission resolution and enforcement.

pub mod enforcer;
pub mod policies;
pub mod principal;
pub mod resolver;

pub use enforcer::{OperationGroup, PermissionGate, RequiredPermission};
pub use policies::{DEFAULT_ROLE, MASTER_ROLE, SystemPermission, SystemRole};
pub use principal::Principal;
pub use resolver::PermissionResolver;
