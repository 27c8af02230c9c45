//! Configuration inspection commands.

use clap::{Args, Subcommand};

use sentinel_core::config::AppConfig;
use sentinel_core::error::AppError;

use crate::output::{self, OutputFormat, Summary};

/// Shortest signing secret accepted without a warning.
const MIN_SECRET_LENGTH: usize = 32;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked)
    Show,
    /// Validate the effective configuration
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.auth.jwt_secret = mask_secret(&shown.auth.jwt_secret);
            match format {
                OutputFormat::Json => output::json(&shown)?,
                OutputFormat::Table => Summary::new(format!("Configuration '{config_path}'"))
                    .field("JWT secret", &shown.auth.jwt_secret)
                    .field("Access token TTL", format!("{} min", shown.auth.access_ttl_minutes))
                    .field("Refresh token TTL", format!("{} h", shown.auth.refresh_ttl_hours))
                    .field("Max failed attempts", shown.auth.max_failed_attempts)
                    .field(
                        "Lockout duration",
                        format!("{} min", shown.auth.lockout_duration_minutes),
                    )
                    .field(
                        "Password max age",
                        format!("{} days", shown.auth.password_max_age_days),
                    )
                    .field(
                        "Password length",
                        format!("{}..={}", shown.password.min_length, shown.password.max_length),
                    )
                    .field("Special characters", &shown.password.special_characters)
                    .field("Weak passwords", shown.password.weak_passwords.len())
                    .field("Master account", &shown.seed.master_email)
                    .field(
                        "Logging",
                        format!("{} ({})", shown.logging.level, shown.logging.format),
                    )
                    .print(),
            }
        }
        ConfigCommand::Validate => {
            let problems = problems(config);
            if !problems.is_empty() {
                let mut err =
                    AppError::configuration(format!("Configuration '{config_path}' is invalid"));
                err.details = problems;
                return Err(err);
            }

            let mut summary = Summary::new(format!("Configuration '{config_path}' is valid"));
            if config.auth.jwt_secret.len() < MIN_SECRET_LENGTH {
                summary = summary.warn(format!(
                    "JWT secret is shorter than {MIN_SECRET_LENGTH} bytes"
                ));
            }
            summary
                .field(
                    "Lockout",
                    format!(
                        "{} failures / {} min",
                        config.auth.max_failed_attempts, config.auth.lockout_duration_minutes
                    ),
                )
                .field("Master account", &config.seed.master_email)
                .print();
        }
    }

    Ok(())
}

/// Settings that would make the core misbehave.
fn problems(config: &AppConfig) -> Vec<String> {
    let mut problems = Vec::new();
    if config.auth.jwt_secret.is_empty() {
        problems.push("auth.jwt_secret must not be empty".to_string());
    }
    if config.auth.access_ttl_minutes == 0 {
        problems.push("auth.access_ttl_minutes must be positive".to_string());
    }
    if config.auth.refresh_ttl_hours == 0 {
        problems.push("auth.refresh_ttl_hours must be positive".to_string());
    }
    if config.auth.max_failed_attempts == 0 {
        problems.push("auth.max_failed_attempts must be positive".to_string());
    }
    if config.password.min_length > config.password.max_length {
        problems.push("password.min_length exceeds password.max_length".to_string());
    }
    if config.password.special_characters.is_empty() {
        problems.push("password.special_characters must not be empty".to_string());
    }
    if config.seed.master_email.trim().is_empty() {
        problems.push("seed.master_email must not be empty".to_string());
    }
    problems
}

/// Mask a secret for display, keeping only its length visible.
fn mask_secret(secret: &str) -> String {
    format!("**** ({} bytes)", secret.len())
}
