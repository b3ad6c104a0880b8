//! Form-level checks applied before the credential store is consulted.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Min 8 chars, uppercase, lowercase, number & special char")]
    PasswordPolicy,

    #[error("Passwords must match")]
    PasswordMismatch,
}

pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl LoginForm<'_> {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingField("Username"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("Password"));
        }
        Ok(())
    }
}

pub struct RegistrationForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

impl RegistrationForm<'_> {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingField("Username"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("Password"));
        }
        if !satisfies_password_policy(self.password) {
            return Err(ValidationError::PasswordPolicy);
        }
        if self.confirm_password.is_empty() {
            return Err(ValidationError::MissingField("Confirm Password"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

/// At least 8 chars with uppercase, lowercase, digit and special character.
fn satisfies_password_policy(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}
