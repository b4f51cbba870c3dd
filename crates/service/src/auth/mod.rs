//! Authentication primitives: password hashing and session tokens.
//!
//! Both services are stateless after construction and safe to share
//! across requests.

pub mod errors;
pub mod password;
pub mod token;

pub use errors::AuthError;
pub use password::CredentialService;
pub use token::{Claims, IssuedToken, TokenService};
