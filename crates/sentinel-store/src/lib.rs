//! # sentinel-store
//!
//! The credential store contract consumed by the auth core, plus an
//! in-memory implementation. Users, roles, and permissions are held in flat
//! id-keyed tables; memberships are join tables of id pairs.

pub mod memory;
pub mod repository;

pub use memory::MemoryCredentialStore;
pub use repository::{CredentialStore, LockoutPolicy, LoginAdmission, UserUpdate};
