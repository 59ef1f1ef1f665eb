//! User profile handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::extractors::DtoJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CreateUserDto, UpdateUserDto, User};
use crate::errors::AppResult;
use crate::types::Created;

/// Create user profile request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "John")]
    pub name: String,
    #[schema(example = "Doe")]
    pub lastname: String,
    /// Identity provider id
    pub auth_id: String,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub id: String,
    pub name: Option<String>,
    pub lastname: Option<String>,
}

/// Create user routes (all protected)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user).put(update_user))
        .route("/:id", get(get_user).delete(delete_user))
}

/// List active users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active users", body = Vec<User>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.user_service.get_all().await?;
    Ok(Json(users))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.user_service.get_by_id(&id).await?;
    Ok(Json(user))
}

/// Create a user profile
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    DtoJson(dto): DtoJson<CreateUserDto>,
) -> AppResult<Created<User>> {
    let user = state.user_service.create(dto).await?;
    Ok(Created(user))
}

/// Update a user profile; the id travels in the body
#[utoipa::path(
    put,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    DtoJson(dto): DtoJson<UpdateUserDto>,
) -> AppResult<Json<User>> {
    let user = state.user_service.update(dto).await?;
    Ok(Json(user))
}

/// Soft-delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.user_service.delete_by_id(&id).await?;
    tracing::info!(deleted_by = %current_user.auth_id, user_id = %id, "User deleted");
    Ok(Json(user))
}
