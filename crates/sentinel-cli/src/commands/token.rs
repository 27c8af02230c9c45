//! Token inspection commands.

use std::sync::Arc;

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use sentinel_auth::{Claims, JwtDecoder};
use sentinel_core::config::AppConfig;
use sentinel_core::error::AppError;
use sentinel_core::{Clock, SystemClock};

use crate::output::{self, OutputFormat, Summary};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Expected token type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExpectedType {
    /// Short-lived access token
    Access,
    /// Long-lived refresh token
    Refresh,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Validate a token with the configured secret and show its claims
    Inspect {
        /// The token, with or without a `Bearer ` prefix
        token: String,
        /// Require the token to be of this type
        #[arg(short = 't', long = "type", value_enum)]
        expected: Option<ExpectedType>,
    },
}

/// Validated token report
#[derive(Debug, Serialize)]
struct TokenReport {
    claims: Claims,
    remaining_seconds: u64,
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let decoder = JwtDecoder::new(&config.auth, Arc::clone(&clock));

    match &args.command {
        TokenCommand::Inspect { token, expected } => {
            let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
            let claims = match expected {
                Some(ExpectedType::Access) => decoder.decode_access_token(token)?,
                Some(ExpectedType::Refresh) => decoder.decode_refresh_token(token)?,
                None => decoder.validate(token)?,
            };

            let report = TokenReport {
                remaining_seconds: claims.remaining_ttl_seconds(clock.now()),
                claims,
            };

            match format {
                OutputFormat::Json => output::json(&report)?,
                OutputFormat::Table => Summary::new("Token is valid")
                    .field("Subject", &report.claims.sub)
                    .field("Email", &report.claims.email)
                    .field("Type", &report.claims.token_type)
                    .field("Token ID", &report.claims.jti)
                    .field_opt(
                        "Expires at",
                        report.claims.expires_at().map(|at| at.to_rfc3339()),
                    )
                    .field("Remaining", format!("{} s", report.remaining_seconds))
                    .print(),
            }
        }
    }

    Ok(())
}
