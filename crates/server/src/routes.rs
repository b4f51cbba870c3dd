use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod auth;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public routes, token-protected user
/// routes, tracing and CORS.
pub fn build_router(state: auth::ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/v1/users/register", post(users::register))
        .route("/api/v1/users/login", post(users::login))
        // Expired tokens within the grace period are accepted here, so the
        // strict middleware does not apply
        .route("/api/v1/users/refresh-token", post(users::refresh_token));

    let protected = Router::new()
        .route(
            "/api/v1/users/profile",
            get(users::get_profile).put(users::update_profile).delete(users::delete_account),
        )
        .route("/api/v1/users/password", put(users::change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state));

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
