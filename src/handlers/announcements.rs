use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::policy::{self, Action};
use crate::auth::AuthContext;
use crate::entities::announcement;
use crate::errors::ServiceError;
use crate::services::announcements::{CreateAnnouncementRequest, UpdateAnnouncementRequest};
use crate::{ApiResponse, AppState, ApiResult, CreatedResult};

#[utoipa::path(
    get,
    path = "/api/v1/announcements",
    responses((status = 200, description = "Announcements, pinned first, newest first")),
    security(("bearer_auth" = [])),
    tag = "announcements"
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    _ctx: AuthContext,
) -> ApiResult<Vec<announcement::Model>> {
    let announcements = state.services.announcements.list_announcements().await?;
    Ok(Json(ApiResponse::success(announcements)))
}

#[utoipa::path(
    post,
    path = "/api/v1/announcements",
    request_body = CreateAnnouncementRequest,
    responses(
        (status = 201, description = "Announcement created"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "announcements"
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<CreateAnnouncementRequest>,
) -> CreatedResult<announcement::Model> {
    policy::ensure(
        &ctx,
        Action::ManageAnnouncements,
        state.config.advance_policy(),
    )?;
    let announcement = state
        .services
        .announcements
        .create_announcement(&ctx, req)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(announcement))))
}

#[utoipa::path(
    put,
    path = "/api/v1/announcements/{id}",
    params(("id" = i64, Path, description = "Announcement id")),
    request_body = UpdateAnnouncementRequest,
    responses(
        (status = 200, description = "Announcement updated"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Announcement not found")
    ),
    security(("bearer_auth" = [])),
    tag = "announcements"
)]
pub async fn update_announcement(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAnnouncementRequest>,
) -> ApiResult<announcement::Model> {
    policy::ensure(
        &ctx,
        Action::ManageAnnouncements,
        state.config.advance_policy(),
    )?;
    let announcement = state
        .services
        .announcements
        .update_announcement(id, req)
        .await?;
    Ok(Json(ApiResponse::success(announcement)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/announcements/{id}",
    params(("id" = i64, Path, description = "Announcement id")),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Announcement not found")
    ),
    security(("bearer_auth" = [])),
    tag = "announcements"
)]
pub async fn delete_announcement(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    policy::ensure(
        &ctx,
        Action::ManageAnnouncements,
        state.config.advance_policy(),
    )?;
    state.services.announcements.delete_announcement(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
