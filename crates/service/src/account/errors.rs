use thiserror::Error;

use crate::auth::AuthError;

/// Business errors for account workflows
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid email format")]
    InvalidEmail,
    #[error("password does not meet security requirements")]
    WeakPassword,
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("email already exists")]
    EmailExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("user not found")]
    NotFound,
    #[error("hashing error: {0}")]
    Hashing(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl AccountError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AccountError::InvalidEmail => 1001,
            AccountError::WeakPassword => 1002,
            AccountError::InvalidName(_) => 1003,
            AccountError::EmailExists => 1004,
            AccountError::InvalidCredentials => 1005,
            AccountError::InvalidToken => 1006,
            AccountError::NotFound => 1007,
            AccountError::Hashing(_) => 1101,
            AccountError::Token(_) => 1102,
            AccountError::Storage(_) => 1200,
        }
    }
}

impl From<AuthError> for AccountError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken => AccountError::InvalidToken,
            AuthError::Hashing(m) => AccountError::Hashing(m),
            AuthError::Token(m) | AuthError::Config(m) => AccountError::Token(m),
        }
    }
}

impl From<models::errors::ModelError> for AccountError {
    fn from(e: models::errors::ModelError) -> Self {
        use models::errors::ModelError;
        if e.is_unique_violation() {
            return AccountError::EmailExists;
        }
        match e {
            ModelError::NotFound(_) => AccountError::NotFound,
            other => AccountError::Storage(other.to_string()),
        }
    }
}
