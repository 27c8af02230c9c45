//! Interactive login against a freshly seeded in-memory store.
//!
//! Useful for trying the lockout and approval rules by hand: the store lives
//! only for the duration of the command.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use sentinel_core::config::AppConfig;
use sentinel_core::error::AppError;
use sentinel_core::types::ErrorResponse;
use sentinel_core::SystemClock;
use sentinel_service::{AppState, LoginRequest, LoginResponse};
use sentinel_store::MemoryCredentialStore;

use crate::output::{self, OutputFormat, Summary};

/// Arguments for the login command
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email to log in with (will prompt if not provided)
    #[arg(short, long)]
    pub email: Option<String>,
}

/// Resolved permission row for table output
#[derive(Debug, Serialize, Tabled)]
struct GrantRow {
    /// Permission name
    permission: String,
}

/// Execute the login command
pub async fn execute(
    args: &LoginArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let default_email = args
        .email
        .clone()
        .unwrap_or_else(|| config.seed.master_email.clone());

    let state = AppState::build(
        config,
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(SystemClock),
    );
    let report = state.seed().await?;
    info!(
        permissions = report.permissions_created,
        roles = report.roles_created,
        "In-memory store seeded"
    );

    loop {
        let email: String = dialoguer::Input::new()
            .with_prompt("Email")
            .default(default_email.clone())
            .interact_text()
            .map_err(super::input_error)?;
        let password = dialoguer::Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()
            .map_err(super::input_error)?;

        match state
            .auth_service
            .login(LoginRequest {
                email,
                password,
                remember_me: false,
            })
            .await
        {
            Ok(response) => return show_session(&state, &response, format).await,
            Err(e) if e.kind.is_internal() => return Err(e),
            Err(e) => output::rejection(&ErrorResponse::from(&e)),
        }

        let again = dialoguer::Confirm::new()
            .with_prompt("Try again?")
            .default(true)
            .interact()
            .map_err(super::input_error)?;
        if !again {
            return Ok(());
        }
    }
}

async fn show_session(
    state: &AppState,
    response: &LoginResponse,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut permissions: Vec<String> = state
        .permission_gate
        .resolver()
        .resolve(response.user.id)
        .await?
        .into_iter()
        .collect();
    permissions.sort();

    match format {
        OutputFormat::Json => {
            #[derive(Debug, Serialize)]
            struct Session<'a> {
                session: &'a LoginResponse,
                permissions: &'a [String],
            }
            output::json(&Session {
                session: response,
                permissions: &permissions,
            })?;
        }
        OutputFormat::Table => {
            Summary::new(format!("Logged in as {}", response.user.email))
                .field("Name", &response.user.name)
                .field("Roles", response.user.roles.join(", "))
                .field("Expires in", format!("{} s", response.expires_in))
                .field("Access token", &response.access_token)
                .print();
            let rows: Vec<GrantRow> = permissions
                .into_iter()
                .map(|permission| GrantRow { permission })
                .collect();
            output::rows(&rows, format, "No permissions granted.")?;
        }
    }

    Ok(())
}
