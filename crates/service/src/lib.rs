//! Service layer for the account service.
//! - Credential hashing and session tokens live in `auth`.
//! - Account use cases, validation and persistence contracts live in `account`.
//! - Reuses entity definitions from the `models` crate.

pub mod account;
pub mod auth;
#[cfg(test)]
pub mod test_support;
