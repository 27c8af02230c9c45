//! Credential verification and token issuance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sentinel_auth::{
    AccountGuard, JwtDecoder, JwtEncoder, LockoutTracker, PasswordHasher, PermissionGate,
};
use sentinel_core::Clock;
use sentinel_core::config::AuthConfig;
use sentinel_core::error::AppError;
use sentinel_core::result::AppResult;
use sentinel_entity::user::normalize_email;
use sentinel_entity::{User, UserSummary};
use sentinel_store::CredentialStore;

use crate::context::RequestContext;
use crate::user::summarize;

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address, any case.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Accepted for client compatibility; token lifetimes do not depend on it.
    #[serde(default)]
    pub remember_me: bool,
}

/// Tokens and user summary returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated user.
    pub user: UserSummary,
}

/// Handles login, refresh, logout, and bearer authentication.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// Credential store.
    store: Arc<dyn CredentialStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
    /// Token validator.
    decoder: Arc<JwtDecoder>,
    /// Enforcement gate, used to turn bearer tokens into principals.
    gate: Arc<PermissionGate>,
    /// Pre-verification account checks.
    guard: AccountGuard,
    /// Failed-login counter.
    lockout: LockoutTracker,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        gate: Arc<PermissionGate>,
        config: &AuthConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lockout: LockoutTracker::from_config(Arc::clone(&store), config),
            guard: AccountGuard::from_config(config),
            store,
            hasher,
            encoder,
            decoder,
            gate,
            clock,
        }
    }

    /// Authenticates with email and password and issues a token pair.
    ///
    /// An unknown email and a wrong password fail identically. Account
    /// state is checked before the password is compared; a wrong password
    /// counts toward the lockout threshold.
    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginResponse> {
        let email = normalize_email(&req.email);
        let now = self.clock.now();

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            self.hasher.verify_decoy(&req.password);
            warn!(email = %email, "Login failed: unknown email");
            return Err(AppError::invalid_credentials());
        };

        if let Err(e) = self.guard.check(&user, now) {
            warn!(user_id = %user.id, reason = %e.kind, "Login refused by account state");
            return Err(e);
        }

        // The state above was read without the row lock; admission re-checks
        // the lock atomically and caps comparisons in flight at the threshold.
        let user = self.lockout.admit(user.id, now).await?;

        let matches = match self
            .hasher
            .verify_password(&req.password, &user.password_hash)
        {
            Ok(matches) => matches,
            Err(e) => {
                self.lockout.abandon(user.id).await;
                return Err(e);
            }
        };

        if !matches {
            self.lockout.record_failure(user.id, now).await;
            return Err(AppError::invalid_credentials());
        }

        let user = self.lockout.record_success(user.id, now).await?;
        let response = self.issue(&user).await?;

        info!(
            user_id = %user.id,
            email = %user.email,
            remember_me = req.remember_me,
            "User logged in"
        );

        Ok(response)
    }

    /// Exchanges a valid refresh token for a new token pair.
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<LoginResponse> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;

        let user = self
            .store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::token_invalid("Token subject no longer exists"))?;

        let response = self.issue(&user).await?;
        info!(user_id = %user.id, "Tokens refreshed");
        Ok(response)
    }

    /// Ends the caller's session. Tokens are discarded client-side.
    pub async fn logout(&self, ctx: &RequestContext) -> AppResult<()> {
        let user_id = ctx.user_id()?;
        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Builds a request context from a bearer access token.
    pub async fn authenticate(&self, bearer: &str) -> AppResult<RequestContext> {
        let principal = self.gate.principal_from_token(bearer).await?;
        Ok(RequestContext::authenticated(principal, self.clock.now()))
    }

    async fn issue(&self, user: &User) -> AppResult<LoginResponse> {
        let pair = self.encoder.generate_token_pair(user.id, &user.email)?;
        let summary = summarize(self.store.as_ref(), user).await?;

        Ok(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: pair.expires_in,
            user: summary,
        })
    }
}
