//! # sentinel-auth
//!
//! Authentication and authorization core for Sentinel.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and the password policy validator
//! - `jwt`: signed access/refresh token issuance and validation
//! - `account`: account state gating and failed-login lockout
//! - `rbac`: permission resolution, the enforcement gate, and the built-in catalog

pub mod account;
pub mod jwt;
pub mod password;
pub mod rbac;

pub use account::{AccountGuard, LockoutTracker};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use password::{PasswordHasher, PasswordValidator, PasswordViolation};
pub use rbac::{
    DEFAULT_ROLE, MASTER_ROLE, OperationGroup, PermissionGate, PermissionResolver, Principal,
    RequiredPermission, SystemPermission, SystemRole,
};
