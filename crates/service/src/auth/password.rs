use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use configs::HashingConfig;
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Argon2id hashing with a configurable work factor.
///
/// Hashes are PHC strings carrying their own salt and parameters, so
/// verification keeps working after the work factor is raised.
#[derive(Clone)]
pub struct CredentialService {
    argon: Argon2<'static>,
    /// Verified against when the account does not exist, so that path costs
    /// the same as a wrong password.
    dummy_hash: String,
}

impl CredentialService {
    pub fn new(cfg: &HashingConfig) -> Result<Self, AuthError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| AuthError::Config(format!("argon2 params: {e}")))?;
        let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon, "timing-equalizer-not-a-password")?;
        Ok(Self { argon, dummy_hash })
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        hash_with(&self.argon, plaintext)
    }

    /// Check `plaintext` against a stored PHC hash.
    ///
    /// `Ok(false)` means the password is wrong; a stored value that is not a
    /// parseable hash is an error.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
        match self.argon.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }

    /// Burn one verification worth of CPU; the outcome is irrelevant.
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.dummy_hash);
    }
}

fn hash_with(argon: &Argon2<'static>, plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .to_string();
    Ok(hash)
}
