//! Account state gating and failed-login lockout.

pub mod guard;
pub mod lockout;

pub use guard::AccountGuard;
pub use lockout::LockoutTracker;
