//! Application state wiring every shared dependency together.

use std::sync::Arc;

use sentinel_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator, PermissionGate};
use sentinel_core::Clock;
use sentinel_core::config::AppConfig;
use sentinel_core::result::AppResult;
use sentinel_store::CredentialStore;

use crate::auth::AuthService;
use crate::role::RoleService;
use crate::seed::{self, SeedReport};
use crate::user::{AdminUserService, UserService};

/// Application state containing all shared dependencies.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Time source
    pub clock: Arc<dyn Clock>,

    // ── Infrastructure ───────────────────────────────────────
    /// Credential store
    pub store: Arc<dyn CredentialStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Password policy validator
    pub password_validator: Arc<PasswordValidator>,
    /// Permission enforcement gate
    pub permission_gate: Arc<PermissionGate>,

    // ── Services ─────────────────────────────────────────────
    /// Login, refresh, logout
    pub auth_service: Arc<AuthService>,
    /// Registration and self-service
    pub user_service: Arc<UserService>,
    /// Admin user management
    pub admin_user_service: Arc<AdminUserService>,
    /// Role administration
    pub role_service: Arc<RoleService>,
}

impl AppState {
    /// Builds every component from configuration over the given store and clock.
    pub fn build(config: AppConfig, store: Arc<dyn CredentialStore>, clock: Arc<dyn Clock>) -> Self {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth, Arc::clone(&clock)));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth, Arc::clone(&clock)));
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.password));
        let permission_gate = Arc::new(PermissionGate::new(
            Arc::clone(&store),
            Arc::clone(&jwt_decoder),
        ));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::clone(&password_hasher),
            Arc::clone(&jwt_encoder),
            Arc::clone(&jwt_decoder),
            Arc::clone(&permission_gate),
            &config.auth,
            Arc::clone(&clock),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&store),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            Arc::clone(&clock),
        ));
        let admin_user_service = Arc::new(AdminUserService::new(
            Arc::clone(&store),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            Arc::clone(&permission_gate),
            Arc::clone(&clock),
        ));
        let role_service = Arc::new(RoleService::new(
            Arc::clone(&store),
            Arc::clone(&permission_gate),
            Arc::clone(&clock),
        ));

        Self {
            config: Arc::new(config),
            clock,
            store,
            jwt_encoder,
            jwt_decoder,
            password_hasher,
            password_validator,
            permission_gate,
            auth_service,
            user_service,
            admin_user_service,
            role_service,
        }
    }

    /// Seeds system permissions, roles, and the master account.
    pub async fn seed(&self) -> AppResult<SeedReport> {
        seed::initialize(
            self.store.as_ref(),
            &self.password_hasher,
            &self.config.seed,
            self.clock.now(),
        )
        .await
    }
}
