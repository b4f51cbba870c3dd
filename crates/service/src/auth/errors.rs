use thiserror::Error;

/// Failures of the credential and token primitives.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid auth configuration: {0}")]
    Config(String),
    #[error("hashing error: {0}")]
    Hashing(String),
    #[error("token error: {0}")]
    Token(String),
    /// Malformed, badly signed or expired; deliberately not more specific.
    #[error("invalid or expired token")]
    InvalidToken,
}
