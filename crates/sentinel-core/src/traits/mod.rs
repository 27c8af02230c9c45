//! Core traits shared across Sentinel crates.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
