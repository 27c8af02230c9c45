//! Password policy commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sentinel_auth::{PasswordHasher, PasswordValidator, PasswordViolation};
use sentinel_core::config::AppConfig;
use sentinel_core::error::AppError;

use crate::output::{self, OutputFormat, Summary};

/// Arguments for password commands
#[derive(Debug, Args)]
pub struct PasswordArgs {
    /// Password subcommand
    #[command(subcommand)]
    pub command: PasswordCommand,
}

/// Password subcommands
#[derive(Debug, Subcommand)]
pub enum PasswordCommand {
    /// Check a password against the configured policy
    Check {
        /// Password to check (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Hash a password with Argon2id
    Hash {
        /// Password to hash (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Hash even if the password violates the policy
        #[arg(long)]
        skip_policy: bool,
    },
}

/// Violation display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ViolationRow {
    /// Rule that failed
    rule: String,
    /// Message shown to the user
    message: String,
}

impl From<&PasswordViolation> for ViolationRow {
    fn from(violation: &PasswordViolation) -> Self {
        Self {
            rule: rule_name(violation).to_string(),
            message: violation.to_string(),
        }
    }
}

/// Execute password commands
pub fn execute(
    args: &PasswordArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let validator = PasswordValidator::new(&config.password);

    match &args.command {
        PasswordCommand::Check { password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .allow_empty_password(true)
                    .interact()
                    .map_err(super::input_error)?,
            };

            let violations = validator.validate(&password);
            if violations.is_empty() {
                Summary::new("Password satisfies the policy").print();
                return Ok(());
            }

            let rows: Vec<ViolationRow> = violations.iter().map(ViolationRow::from).collect();
            output::rows(&rows, format, "")?;
            return Err(AppError::validation_failed(
                violations.iter().map(ToString::to_string).collect(),
            ));
        }
        PasswordCommand::Hash {
            password,
            skip_policy,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(super::input_error)?,
            };

            if *skip_policy {
                output::warning("Password policy skipped");
            } else {
                validator.ensure_valid(&password)?;
            }

            let hash = PasswordHasher::new().hash_password(&password)?;
            println!("{hash}");
        }
    }

    Ok(())
}

fn rule_name(violation: &PasswordViolation) -> &'static str {
    match violation {
        PasswordViolation::Empty => "empty",
        PasswordViolation::TooShort(_) => "min_length",
        PasswordViolation::TooLong(_) => "max_length",
        PasswordViolation::MissingLowercase => "lowercase",
        PasswordViolation::MissingUppercase => "uppercase",
        PasswordViolation::MissingDigit => "digit",
        PasswordViolation::MissingSpecial(_) => "special",
        PasswordViolation::SequentialRun(_) => "sequence",
        PasswordViolation::RepeatedRun(_) => "repetition",
        PasswordViolation::CommonPassword(_) => "common_word",
    }
}
