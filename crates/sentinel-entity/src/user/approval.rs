//! Account approval status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative approval gate, independent of the active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    /// Registered and waiting for an administrator.
    Pending,
    /// Allowed to authenticate.
    Approved,
    /// Refused by an administrator.
    Rejected,
}

impl ApprovalStatus {
    /// Check if an account with this status may authenticate.
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Return the status as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = sentinel_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(sentinel_core::AppError::validation(format!(
                "Invalid approval status: '{s}'. Expected one of: PENDING, APPROVED, REJECTED"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "approved".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::Approved
        );
        assert_eq!(
            "PENDING".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::Pending
        );
        assert!("maybe".parse::<ApprovalStatus>().is_err());
    }

    #[test]
    fn test_only_approved_can_login() {
        assert!(ApprovalStatus::Approved.can_login());
        assert!(!ApprovalStatus::Pending.can_login());
        assert!(!ApprovalStatus::Rejected.can_login());
    }
}
