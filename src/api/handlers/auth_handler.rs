//! Authentication handlers.

use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::extractors::DtoJson;
use crate::api::middleware::bearer_token;
use crate::api::AppState;
use crate::domain::{AuthIdentity, Dto, LoginDto, LogoutDto, RegisterDto};
use crate::errors::AppResult;
use crate::services::Registration;
use crate::types::{Created, NoContent};

/// User registration request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
    #[schema(example = "John")]
    pub name: String,
    #[schema(example = "Doe")]
    pub lastname: String,
}

/// User login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Register an identity and its user profile
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = Registration),
        (status = 400, description = "Invalid data or rejected by the identity provider")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    DtoJson(dto): DtoJson<RegisterDto>,
) -> AppResult<Created<Registration>> {
    let registration = state.auth_service.register(dto).await?;
    Ok(Created(registration))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthIdentity),
        (status = 400, description = "Invalid data or credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    DtoJson(dto): DtoJson<LoginDto>,
) -> AppResult<Json<AuthIdentity>> {
    let identity = state.auth_service.login(dto).await?;
    Ok(Json(identity))
}

/// End every session of the bearer token's owner
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 400, description = "Rejected by the identity provider"),
        (status = 401, description = "Missing bearer token")
    )
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<NoContent> {
    let token = bearer_token(&headers)?;
    let dto = LogoutDto::create(&json!({ "accessToken": token }))?;

    state.auth_service.logout(dto).await?;
    Ok(NoContent)
}
