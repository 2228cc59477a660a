use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::policy::{self, Action};
use crate::auth::AuthContext;
use crate::entities::cylinder;
use crate::errors::ServiceError;
use crate::services::cylinders::{
    AdvanceCylinderStatusRequest, CreateCylinderRequest, CylinderListQuery, CylinderStats,
    UpdateCylinderRequest,
};
use crate::{ApiResponse, AppState, ApiResult, CreatedResult};

#[utoipa::path(
    get,
    path = "/api/v1/cylinders",
    params(CylinderListQuery),
    responses((status = 200, description = "Cylinder list")),
    security(("bearer_auth" = [])),
    tag = "cylinders"
)]
pub async fn list_cylinders(
    State(state): State<AppState>,
    _ctx: AuthContext,
    Query(query): Query<CylinderListQuery>,
) -> ApiResult<Vec<cylinder::Model>> {
    let cylinders = state.services.cylinders.list_cylinders(query).await?;
    Ok(Json(ApiResponse::success(cylinders)))
}

#[utoipa::path(
    post,
    path = "/api/v1/cylinders",
    request_body = CreateCylinderRequest,
    responses(
        (status = 201, description = "Cylinder created"),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Serial code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "cylinders"
)]
pub async fn create_cylinder(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<CreateCylinderRequest>,
) -> CreatedResult<cylinder::Model> {
    policy::ensure(&ctx, Action::ManageCylinders, state.config.advance_policy())?;
    let cylinder = state.services.cylinders.create_cylinder(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(cylinder))))
}

#[utoipa::path(
    put,
    path = "/api/v1/cylinders/{id}",
    params(("id" = i64, Path, description = "Cylinder id")),
    request_body = UpdateCylinderRequest,
    responses(
        (status = 200, description = "Cylinder updated"),
        (status = 404, description = "Cylinder not found")
    ),
    security(("bearer_auth" = [])),
    tag = "cylinders"
)]
pub async fn update_cylinder(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCylinderRequest>,
) -> ApiResult<cylinder::Model> {
    policy::ensure(&ctx, Action::ManageCylinders, state.config.advance_policy())?;
    let cylinder = state.services.cylinders.update_cylinder(id, req).await?;
    Ok(Json(ApiResponse::success(cylinder)))
}

#[utoipa::path(
    put,
    path = "/api/v1/cylinders/{id}/status",
    params(("id" = i64, Path, description = "Cylinder id")),
    request_body = AdvanceCylinderStatusRequest,
    responses(
        (status = 200, description = "Status advanced"),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Cylinder not found")
    ),
    security(("bearer_auth" = [])),
    tag = "cylinders"
)]
pub async fn advance_cylinder_status(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<AdvanceCylinderStatusRequest>,
) -> ApiResult<cylinder::Model> {
    policy::ensure(
        &ctx,
        Action::AdvanceCylinderStatus,
        state.config.advance_policy(),
    )?;
    let cylinder = state
        .services
        .cylinders
        .advance_status(id, req.status)
        .await?;
    Ok(Json(ApiResponse::success(cylinder)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cylinders/{id}",
    params(("id" = i64, Path, description = "Cylinder id")),
    responses(
        (status = 204, description = "Cylinder deleted"),
        (status = 400, description = "Cylinder is out with a courier or customer"),
        (status = 404, description = "Cylinder not found")
    ),
    security(("bearer_auth" = [])),
    tag = "cylinders"
)]
pub async fn delete_cylinder(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    policy::ensure(&ctx, Action::ManageCylinders, state.config.advance_policy())?;
    state.services.cylinders.delete_cylinder(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/cylinders/stats",
    responses((status = 200, description = "Per-status counts and expiring-soon", body = CylinderStats)),
    security(("bearer_auth" = [])),
    tag = "cylinders"
)]
pub async fn cylinder_stats(
    State(state): State<AppState>,
    _ctx: AuthContext,
) -> ApiResult<CylinderStats> {
    let stats = state.services.cylinders.stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}
