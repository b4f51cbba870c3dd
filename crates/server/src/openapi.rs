use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct UpdateProfileRequest {
    pub name: String,
}

#[derive(ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(ToSchema)]
pub struct UserProfileDoc {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: UserProfileDoc,
}

#[derive(ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::refresh_token,
        crate::routes::users::get_profile,
        crate::routes::users::update_profile,
        crate::routes::users::change_password,
        crate::routes::users::delete_account,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            UserProfileDoc,
            LoginResponse,
            TokenResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;
