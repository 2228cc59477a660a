use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::policy::{self, Action};
use crate::auth::AuthContext;
use crate::entities::user;
use crate::errors::ServiceError;
use crate::services::users::{CreateUserRequest, UpdateUserRequest, UserListQuery};
use crate::{ApiResponse, AppState, ApiResult, CreatedResult};

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "User list"),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Vec<user::Model>> {
    policy::ensure(&ctx, Action::ViewUsers, state.config.advance_policy())?;
    let users = state.services.users.list_users(query).await?;
    Ok(Json(ApiResponse::success(users)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Username already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<CreateUserRequest>,
) -> CreatedResult<user::Model> {
    policy::ensure(&ctx, Action::ManageUsers, state.config.advance_policy())?;
    let user = state.services.users.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<user::Model> {
    policy::ensure(&ctx, Action::ManageUsers, state.config.advance_policy())?;
    let user = state.services.users.update_user(id, req).await?;
    Ok(Json(ApiResponse::success(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    policy::ensure(&ctx, Action::ManageUsers, state.config.advance_policy())?;
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
