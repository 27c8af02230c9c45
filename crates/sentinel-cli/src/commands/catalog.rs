//! System permission and role catalog commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sentinel_auth::{SystemPermission, SystemRole};
use sentinel_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog subcommand
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List the system permissions
    Permissions {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List the system roles and what they grant
    Roles,
}

/// Permission display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    /// Permission name
    name: &'static str,
    /// Category
    category: &'static str,
    /// Action
    action: &'static str,
    /// Description
    description: &'static str,
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role name
    name: &'static str,
    /// Description
    description: &'static str,
    /// Number of granted permissions
    permissions: usize,
}

/// Execute catalog commands
pub fn execute(args: &CatalogArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        CatalogCommand::Permissions { category } => {
            let rows: Vec<PermissionRow> = SystemPermission::ALL
                .iter()
                .filter(|p| {
                    category
                        .as_deref()
                        .is_none_or(|c| p.category().eq_ignore_ascii_case(c))
                })
                .map(|p| PermissionRow {
                    name: p.as_str(),
                    category: p.category(),
                    action: p.action(),
                    description: p.description(),
                })
                .collect();
            output::rows(&rows, format, "No permissions in that category.")?;
        }
        CatalogCommand::Roles => {
            let rows: Vec<RoleRow> = SystemRole::ALL
                .iter()
                .map(|r| RoleRow {
                    name: r.name(),
                    description: r.description(),
                    permissions: r.permissions().len(),
                })
                .collect();
            output::rows(&rows, format, "No system roles defined.")?;
        }
    }

    Ok(())
}
