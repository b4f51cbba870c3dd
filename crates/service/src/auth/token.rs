use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::errors::AuthError;
use configs::MAX_TOKEN_TTL;

/// Payload of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier.
    pub sub: String,
    pub email: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expires-at, unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Duration,
    /// How long after expiry a token can still be refreshed.
    pub refresh_grace: Duration,
}

impl From<&configs::AuthConfig> for TokenConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { secret: cfg.jwt_secret.clone(), ttl: cfg.token_ttl, refresh_grace: cfg.refresh_grace }
    }
}

/// Issues and checks HS256 session tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
    strict: Validation,
    refresh: Validation,
}

impl TokenService {
    pub fn new(cfg: &TokenConfig) -> Result<Self, AuthError> {
        if cfg.secret.is_empty() {
            return Err(AuthError::Config("token signing secret is empty".into()));
        }
        if cfg.ttl.is_zero() {
            return Err(AuthError::Config("token lifetime must be positive".into()));
        }
        if cfg.ttl > MAX_TOKEN_TTL {
            return Err(AuthError::Config("token lifetime must be at most 365 days".into()));
        }
        if cfg.refresh_grace > cfg.ttl {
            return Err(AuthError::Config("refresh grace must not exceed the token lifetime".into()));
        }
        let ttl = TimeDelta::from_std(cfg.ttl).map_err(|e| AuthError::Config(format!("token lifetime: {e}")))?;

        let mut strict = Validation::new(Algorithm::HS256);
        strict.leeway = 0;
        strict.validate_exp = true;
        strict.set_required_spec_claims(&["exp", "sub"]);

        let mut refresh = strict.clone();
        refresh.leeway = cfg.refresh_grace.as_secs();

        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl,
            strict,
            refresh,
        })
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, email, Utc::now())
    }

    fn issue_at(&self, user_id: Uuid, email: &str, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Token("token expiry out of range".into()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(e.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Signature and expiry, no leeway.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_with(token, &self.strict)
    }

    /// Re-issue from a token that is still valid or expired within the grace
    /// period. The password is not checked again.
    pub fn refresh(&self, token: &str) -> Result<(Claims, IssuedToken), AuthError> {
        let claims = self.decode_with(token, &self.refresh)?;
        let issued = self.issue(claims.user_id()?, &claims.email)?;
        Ok((claims, issued))
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "token rejected");
                AuthError::InvalidToken
            })?;
        claims.user_id()?;
        Ok(claims)
    }
}
