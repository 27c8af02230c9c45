//! Boot-time seed configuration.

use serde::{Deserialize, Serialize};

/// Master account created on first boot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Email of the master account.
    #[serde(default = "default_master_email")]
    pub master_email: String,
    /// Initial password of the master account.
    #[serde(default = "default_master_password", skip_serializing)]
    pub master_password: String,
    /// Display name of the master account.
    #[serde(default = "default_master_name")]
    pub master_name: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            master_email: default_master_email(),
            master_password: default_master_password(),
            master_name: default_master_name(),
        }
    }
}

fn default_master_email() -> String {
    "master@enterprise.com".to_string()
}

fn default_master_password() -> String {
    "Master@123".to_string()
}

fn default_master_name() -> String {
    "System Administrator".to_string()
}
