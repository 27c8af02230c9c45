//! # sentinel-core
//!
//! Core crate for Sentinel. Contains the clock abstraction,
//! configuration schemas, typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Sentinel crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use traits::{Clock, ManualClock, SystemClock};
