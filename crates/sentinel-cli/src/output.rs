//! Rendering of command results.
//!
//! Results go to stdout, as a table or as JSON. Failures go to stderr: an
//! operator sees the full [`AppError`], while a refused login is shown as the
//! [`ErrorResponse`] a service caller would receive.

use std::fmt::Display;

use serde::Serialize;
use tabled::{Table, Tabled};

use sentinel_core::error::AppError;
use sentinel_core::types::ErrorResponse;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Prints `items` as a table, or as a JSON array. `empty` replaces an empty table.
pub fn rows<T: Serialize + Tabled>(
    items: &[T],
    format: OutputFormat,
    empty: &str,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => json(items),
        OutputFormat::Table if items.is_empty() => {
            println!("{empty}");
            Ok(())
        }
        OutputFormat::Table => {
            println!("{}", Table::new(items));
            Ok(())
        }
    }
}

/// Prints `value` as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The table form of a single result: a headline, warnings, then aligned fields.
#[derive(Debug)]
pub struct Summary {
    headline: String,
    warnings: Vec<String>,
    fields: Vec<(&'static str, String)>,
}

impl Summary {
    /// Starts a summary under `headline`.
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            warnings: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Adds a field line.
    pub fn field(mut self, key: &'static str, value: impl Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// Adds a field line only when `value` is present.
    pub fn field_opt(self, key: &'static str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Adds a warning shown under the headline.
    pub fn warn(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Renders the summary to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "✓ {}", self.headline)?;
        for warning in &self.warnings {
            write!(f, "\n⚠ {warning}")?;
        }
        for (key, value) in &self.fields {
            write!(f, "\n  {:<24} {value}", format!("{key}:"))?;
        }
        Ok(())
    }
}

/// Prints a warning on its own line.
pub fn warning(message: &str) {
    println!("⚠ {message}");
}

/// Prints a command failure with its details and cause, for the operator.
pub fn error(err: &AppError) {
    eprintln!("✗ {}: {}", err.kind, err.message);
    for detail in &err.details {
        eprintln!("    - {detail}");
    }
    if let Some(source) = std::error::Error::source(err) {
        eprintln!("    caused by: {source}");
    }
}

/// Prints the failure body a service caller would be handed.
pub fn rejection(body: &ErrorResponse) {
    eprintln!("✗ {}: {}", body.error, body.message);
    for detail in &body.details {
        eprintln!("    - {detail}");
    }
}
