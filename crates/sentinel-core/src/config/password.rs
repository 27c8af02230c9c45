//! Password policy configuration.

use serde::{Deserialize, Serialize};

/// Rules applied to every new password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordPolicyConfig {
    /// Minimum password length (characters).
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Maximum password length (characters).
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Characters that satisfy the special-character rule.
    #[serde(default = "default_special_characters")]
    pub special_characters: String,
    /// Common weak passwords rejected as substrings.
    #[serde(default = "default_weak_passwords")]
    pub weak_passwords: Vec<String>,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            special_characters: default_special_characters(),
            weak_passwords: default_weak_passwords(),
        }
    }
}

fn default_min_length() -> usize {
    8
}

fn default_max_length() -> usize {
    100
}

fn default_special_characters() -> String {
    "@$!%*?&".to_string()
}

fn default_weak_passwords() -> Vec<String> {
    [
        "password", "123456", "qwerty", "admin", "letmein", "welcome", "monkey", "dragon",
        "master", "secret",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
