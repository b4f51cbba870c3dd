use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service::account::{AccountService, UserRepository};

use crate::errors::ApiError;

/// Name of the session cookie set at login.
pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub accounts: Arc<AccountService<dyn UserRepository>>,
}

/// Token from `Authorization: Bearer <token>`, falling back to the
/// `auth_token` cookie when the header is absent.
pub fn extract_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid authorization format"))?;
        return match value.strip_prefix("Bearer ") {
            Some(token) => Ok(token.trim().to_string()),
            None => {
                tracing::warn!("invalid Authorization format (expect Bearer)");
                Err(ApiError::unauthorized("Invalid authorization format"))
            }
        };
    }

    let jar = CookieJar::from_headers(headers);
    match jar.get(AUTH_COOKIE).map(|c| c.value().to_string()) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::unauthorized("Authorization header is required")),
    }
}

/// Rejects requests without a valid, unexpired token and attaches the
/// decoded [`service::auth::Claims`] to the request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).inspect_err(|_| {
        tracing::warn!(path = %req.uri().path(), "missing or malformed credentials");
    })?;

    let claims = state.accounts.validate_token(&token).map_err(|_| {
        tracing::warn!(path = %req.uri().path(), "token validation failed");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    cookie
}
