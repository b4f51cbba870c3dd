use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use service::account::domain::{
    AuthSession, ChangePasswordInput, LoginInput, RefreshedToken, RegisterInput, UpdateProfileInput, UserProfile,
};
use service::auth::Claims;

use super::auth::{expired_session_cookie, extract_token, session_cookie, ServerState};
use crate::errors::ApiError;

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = crate::openapi::UserProfileDoc),
        (status = 400, description = "Invalid input", body = crate::openapi::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let Json(input) = payload?;
    let profile = state.accounts.register(input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in; also sets the auth_token cookie", body = crate::openapi::LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthSession>), ApiError> {
    let Json(input) = payload?;
    let session = state.accounts.login(input).await?;
    let jar = jar.add(session_cookie(session.token.clone()));
    Ok((jar, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New token", body = crate::openapi::TokenResponse),
        (status = 401, description = "Invalid or expired token", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn refresh_token(
    State(state): State<ServerState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RefreshedToken>), ApiError> {
    let token = extract_token(&headers)?;
    let refreshed = state.accounts.refresh_token(&token).await?;
    let jar = jar.add(session_cookie(refreshed.token.clone()));
    Ok((jar, Json(refreshed)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = crate::openapi::UserProfileDoc),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorResponse),
        (status = 404, description = "User not found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserProfile>, ApiError> {
    let user_id = claims.user_id().map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
    Ok(Json(state.accounts.profile(user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = crate::openapi::UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = crate::openapi::UserProfileDoc),
        (status = 400, description = "Invalid input", body = crate::openapi::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorResponse),
        (status = 404, description = "User not found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<UpdateProfileInput>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(input) = payload?;
    let user_id = claims.user_id().map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
    Ok(Json(state.accounts.update_profile(user_id, input).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/password",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = crate::openapi::ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Weak new password", body = crate::openapi::ErrorResponse),
        (status = 401, description = "Current password wrong or token invalid", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<ChangePasswordInput>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(input) = payload?;
    let user_id = claims.user_id().map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
    state.accounts.change_password(user_id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorResponse),
        (status = 404, description = "User not found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let user_id = claims.user_id().map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
    state.accounts.delete_account(user_id).await?;
    Ok((jar.remove(expired_session_cookie()), StatusCode::NO_CONTENT))
}
