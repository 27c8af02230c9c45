//! Caller-visible failure bodies.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Structured failure returned at the boundary.
///
/// Built from an [`AppError`]; infrastructure faults collapse to a generic
/// message with no details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Violations or the required permission, when relevant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let details = if err.kind.is_internal() {
            Vec::new()
        } else {
            err.details.clone()
        };
        Self {
            error: err.kind.to_string(),
            message: err.public_message().to_string(),
            details,
        }
    }
}
