//! The authenticated caller.

use serde::{Deserialize, Serialize};

use sentinel_core::types::UserId;

use crate::jwt::Claims;

/// Identity of the caller, passed explicitly into every protected operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Authenticated user ID.
    pub user_id: UserId,
    /// Email carried by the access token.
    pub email: String,
}

impl Principal {
    /// Creates a principal for a known user.
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

impl From<&Claims> for Principal {
    fn from(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.email.clone())
    }
}
