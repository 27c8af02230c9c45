//! CLI command definitions and dispatch.

pub mod catalog;
pub mod config;
pub mod login;
pub mod password;
pub mod token;

use clap::{Parser, Subcommand};

use sentinel_core::config::AppConfig;
use sentinel_core::error::AppError;

use crate::output::OutputFormat;

/// Sentinel: authentication and authorization core
#[derive(Debug, Parser)]
#[command(name = "sentinel", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Configuration inspection
    Config(config::ConfigArgs),
    /// Password policy checks and hashing
    Password(password::PasswordArgs),
    /// Token inspection
    Token(token::TokenArgs),
    /// System permission and role catalog
    Catalog(catalog::CatalogArgs),
    /// Interactive login against a seeded in-memory store
    Login(login::LoginArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
            Commands::Password(args) => password::execute(args, &config, self.format),
            Commands::Token(args) => token::execute(args, &config, self.format),
            Commands::Catalog(args) => catalog::execute(args, self.format),
            Commands::Login(args) => login::execute(args, config, self.format).await,
        }
    }
}

/// Helper: load configuration from file, the `SENTINEL_ENV` overlay, and the environment
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("SENTINEL_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(config_path, &env)
}

/// Helper: map a prompt failure into an application error
pub(crate) fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}
