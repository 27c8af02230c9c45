//! Password policy enforcement for new passwords.

use std::fmt;

use sentinel_core::config::PasswordPolicyConfig;
use sentinel_core::error::AppError;

/// Number of consecutive characters that make a sequential or repeated run.
const RUN_LENGTH: usize = 3;

/// A single rule a candidate password breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordViolation {
    /// Nothing was entered.
    Empty,
    /// Fewer characters than the configured minimum.
    TooShort(usize),
    /// More characters than the configured maximum.
    TooLong(usize),
    /// No lowercase letter.
    MissingLowercase,
    /// No uppercase letter.
    MissingUppercase,
    /// No decimal digit.
    MissingDigit,
    /// None of the configured special characters.
    MissingSpecial(String),
    /// Ascending run such as `abc` or `123`.
    SequentialRun(String),
    /// Same character three times in a row.
    RepeatedRun(String),
    /// Contains a dictionary word.
    CommonPassword(String),
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Password is required"),
            Self::TooShort(min) => write!(f, "Password must be at least {min} characters long"),
            Self::TooLong(max) => write!(f, "Password must not exceed {max} characters"),
            Self::MissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            Self::MissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            Self::MissingDigit => write!(f, "Password must contain at least one digit"),
            Self::MissingSpecial(allowed) => write!(
                f,
                "Password must contain at least one special character ({allowed})"
            ),
            Self::SequentialRun(run) => {
                write!(f, "Password must not contain sequential characters ('{run}')")
            }
            Self::RepeatedRun(run) => {
                write!(f, "Password must not contain repeated characters ('{run}')")
            }
            Self::CommonPassword(word) => {
                write!(f, "Password must not contain the common word '{word}'")
            }
        }
    }
}

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    max_length: usize,
    special_characters: String,
    weak_passwords: Vec<String>,
}

impl PasswordValidator {
    /// Creates a new validator from the password policy configuration.
    pub fn new(config: &PasswordPolicyConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            special_characters: config.special_characters.clone(),
            weak_passwords: config.weak_passwords.clone(),
        }
    }

    /// Checks a password against every rule and returns all violations.
    ///
    /// An empty password yields only [`PasswordViolation::Empty`].
    pub fn validate(&self, password: &str) -> Vec<PasswordViolation> {
        if password.is_empty() {
            return vec![PasswordViolation::Empty];
        }

        let mut violations = Vec::new();
        let length = password.chars().count();

        if length < self.min_length {
            violations.push(PasswordViolation::TooShort(self.min_length));
        }
        if length > self.max_length {
            violations.push(PasswordViolation::TooLong(self.max_length));
        }
        if !password.chars().any(|c| c.is_lowercase()) {
            violations.push(PasswordViolation::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_uppercase()) {
            violations.push(PasswordViolation::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PasswordViolation::MissingDigit);
        }
        if !password.chars().any(|c| self.special_characters.contains(c)) {
            violations.push(PasswordViolation::MissingSpecial(
                self.special_characters.clone(),
            ));
        }

        let folded: Vec<char> = password.to_lowercase().chars().collect();
        if let Some(run) = find_run(&folded, |a, b| b as u32 == a as u32 + 1) {
            violations.push(PasswordViolation::SequentialRun(run));
        }
        if let Some(run) = find_run(&folded, |a, b| a == b) {
            violations.push(PasswordViolation::RepeatedRun(run));
        }

        // Dictionary words match the password as typed.
        if let Some(word) = self
            .weak_passwords
            .iter()
            .find(|word| !word.is_empty() && password.contains(word.as_str()))
        {
            violations.push(PasswordViolation::CommonPassword(word.clone()));
        }

        violations
    }

    /// Validates a password, failing with every violation at once.
    pub fn ensure_valid(&self, password: &str) -> Result<(), AppError> {
        let violations = self.validate(password);
        if violations.is_empty() {
            return Ok(());
        }
        Err(AppError::validation_failed(
            violations.iter().map(ToString::to_string).collect(),
        ))
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(&self, old_password: &str, new_password: &str) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

/// First window of [`RUN_LENGTH`] characters whose neighbours all satisfy `step`.
fn find_run(chars: &[char], step: impl Fn(char, char) -> bool) -> Option<String> {
    chars
        .windows(RUN_LENGTH)
        .find(|window| window.windows(2).all(|pair| step(pair[0], pair[1])))
        .map(|window| window.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&PasswordPolicyConfig::default())
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(validator().validate("Password1!").is_empty());
        assert!(validator().ensure_valid("Zq7@mKp2x").is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let violations = validator().validate("password");
        assert!(violations.contains(&PasswordViolation::MissingUppercase));
        assert!(violations.contains(&PasswordViolation::MissingDigit));
        assert!(violations.contains(&PasswordViolation::MissingSpecial("@$!%*?&".into())));
        assert!(violations.contains(&PasswordViolation::CommonPassword("password".into())));
        assert!(!violations.contains(&PasswordViolation::MissingLowercase));
    }

    #[test]
    fn test_empty_password_reports_only_empty() {
        assert_eq!(validator().validate(""), vec![PasswordViolation::Empty]);
    }

    #[test]
    fn test_length_bounds() {
        let v = validator();
        assert!(v.validate("Aa1!").contains(&PasswordViolation::TooShort(8)));

        let long = format!("Zq7@{}", "mK".repeat(60));
        assert!(v.validate(&long).contains(&PasswordViolation::TooLong(100)));
    }

    #[test]
    fn test_sequential_and_repeated_runs() {
        let v = validator();
        assert!(
            v.validate("Xyabc9@Q")
                .contains(&PasswordViolation::SequentialRun("abc".into()))
        );
        assert!(
            v.validate("Qz@7123k")
                .contains(&PasswordViolation::SequentialRun("123".into()))
        );
        assert!(
            v.validate("Qz@7kAAAm")
                .contains(&PasswordViolation::RepeatedRun("aaa".into()))
        );
    }

    #[test]
    fn test_ensure_valid_carries_every_message() {
        let err = validator().ensure_valid("password").unwrap_err();
        assert_eq!(err.kind, sentinel_core::ErrorKind::Validation);
        assert_eq!(err.violations().len(), 4);
    }

    #[test]
    fn test_validate_not_same() {
        let v = validator();
        assert!(v.validate_not_same("Old@Pass1", "New@Pass2").is_ok());
        assert!(v.validate_not_same("Same@Pass1", "Same@Pass1").is_err());
    }
}
