//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};

use sentinel_auth::Principal;
use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::UserId;

/// Context for the current request.
///
/// Built at the boundary and passed into service methods so that every
/// operation knows *who* is acting. An anonymous context has no principal.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated caller, if any.
    pub principal: Option<Principal>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// A context with no authenticated caller.
    pub fn anonymous(request_time: DateTime<Utc>) -> Self {
        Self {
            principal: None,
            request_time,
        }
    }

    /// A context for an authenticated caller.
    pub fn authenticated(principal: Principal, request_time: DateTime<Utc>) -> Self {
        Self {
            principal: Some(principal),
            request_time,
        }
    }

    /// The caller, if authenticated.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// The caller's user ID, or `Unauthenticated`.
    pub fn user_id(&self) -> AppResult<UserId> {
        self.principal
            .as_ref()
            .map(|p| p.user_id)
            .ok_or_else(AppError::unauthenticated)
    }
}
