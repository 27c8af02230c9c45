//! User domain entities.

pub mod approval;
pub mod model;

pub use approval::ApprovalStatus;
pub use model::{User, UserSummary, normalize_email};
