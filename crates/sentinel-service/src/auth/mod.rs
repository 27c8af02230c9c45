//! Login, token refresh, and bearer authentication.

pub mod service;

pub use service::{AuthService, LoginRequest, LoginResponse};
