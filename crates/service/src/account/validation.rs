//! Input rules for accounts. Each failed rule maps to its own error kind.

use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::AccountError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 128;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

pub fn validate_email(email: &str) -> Result<(), AccountError> {
    if email.len() > 255 || !EMAIL_RE.is_match(email) {
        return Err(AccountError::InvalidEmail);
    }
    Ok(())
}

/// At least eight characters with an uppercase letter, a lowercase letter
/// and a digit.
pub fn validate_password(password: &str) -> Result<(), AccountError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(AccountError::WeakPassword)
    }
}

pub fn validate_name(name: &str) -> Result<(), AccountError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AccountError::InvalidName("name required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AccountError::InvalidName(format!("name longer than {MAX_NAME_LEN} characters")));
    }
    Ok(())
}

/// Registration rules in order: email, password, name.
pub fn validate_registration(email: &str, password: &str, name: &str) -> Result<(), AccountError> {
    validate_email(email)?;
    validate_password(password)?;
    validate_name(name)
}
