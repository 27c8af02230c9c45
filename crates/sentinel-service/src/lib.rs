//! # sentinel-service
//!
//! Business logic service layer for Sentinel. Each service orchestrates the
//! credential store and the auth core to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. The caller's identity always
//! arrives as an explicit [`RequestContext`].

pub mod auth;
pub mod context;
pub mod role;
pub mod seed;
pub mod state;
pub mod user;

pub use auth::{AuthService, LoginRequest, LoginResponse};
pub use context::RequestContext;
pub use role::RoleService;
pub use seed::SeedReport;
pub use state::AppState;
pub use user::{AdminUserService, UserService};
