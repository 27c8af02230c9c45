//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use sentinel_auth::Principal;
use sentinel_core::{Clock, ManualClock};
use sentinel_core::config::AppConfig;
use sentinel_core::result::AppResult;
use sentinel_entity::{ApprovalStatus, Role, User};
use sentinel_service::{AppState, LoginRequest, LoginResponse, RequestContext};
use sentinel_store::{CredentialStore, MemoryCredentialStore};

/// Password that satisfies the default policy.
pub const GOOD_PASSWORD: &str = "Str0ng@Pw";

/// Test application context over a seeded in-memory store.
pub struct TestApp {
    /// Fully wired application state.
    pub state: AppState,
    /// The backing store, for direct inspection.
    pub store: Arc<MemoryCredentialStore>,
    /// Controllable time source.
    pub clock: Arc<ManualClock>,
    /// Application config.
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new seeded test application.
    pub async fn new() -> Self {
        let config = AppConfig::default();
        let store = Arc::new(MemoryCredentialStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
        ));

        let state = AppState::build(config.clone(), store.clone(), clock.clone());
        state.seed().await.expect("seeding failed");

        Self {
            state,
            store,
            clock,
            config,
        }
    }

    /// Create an active user with the given approval status holding `roles`.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        status: ApprovalStatus,
        roles: &[&str],
    ) -> User {
        let hash = self
            .state
            .password_hasher
            .hash_password(password)
            .expect("hash failed");
        let mut user = User::new(email, hash, "Test User", self.clock.now());
        user.approval_status = status;
        let user = self.store.save_user(&user).await.expect("save failed");

        let mut role_ids = Vec::new();
        for name in roles {
            let role = self
                .store
                .find_role_by_name(name)
                .await
                .unwrap()
                .expect("role missing");
            role_ids.push(role.id);
        }
        self.store.set_user_roles(user.id, &role_ids).await.unwrap();
        user
    }

    /// Create an approved user holding `USER`.
    pub async fn create_approved_user(&self, email: &str) -> User {
        self.create_user(email, GOOD_PASSWORD, ApprovalStatus::Approved, &["USER"])
            .await
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        self.state
            .auth_service
            .login(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
                remember_me: false,
            })
            .await
    }

    /// Re-read a user from the store.
    pub async fn reload(&self, user: &User) -> User {
        self.store
            .find_user_by_id(user.id)
            .await
            .unwrap()
            .expect("user missing")
    }

    /// Look up a seeded or created role by name.
    pub async fn role(&self, name: &str) -> Role {
        self.store
            .find_role_by_name(name)
            .await
            .unwrap()
            .expect("role missing")
    }

    /// Write a modified user back to the store.
    pub async fn store_user(&self, user: &User) -> User {
        self.store.save_user(user).await.expect("save failed")
    }

    /// Context acting as `user`.
    pub fn ctx_for(&self, user: &User) -> RequestContext {
        RequestContext::authenticated(
            Principal::new(user.id, user.email.clone()),
            self.clock.now(),
        )
    }

    /// Context acting as the seeded master account.
    pub async fn master_ctx(&self) -> RequestContext {
        let master = self
            .store
            .find_user_by_email(&self.config.seed.master_email)
            .await
            .unwrap()
            .expect("master missing");
        self.ctx_for(&master)
    }

    /// Context with no caller.
    pub fn anonymous(&self) -> RequestContext {
        RequestContext::anonymous(self.clock.now())
    }
}
