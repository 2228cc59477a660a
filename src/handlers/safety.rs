use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::policy::{self, Action};
use crate::auth::AuthContext;
use crate::entities::safety_record;
use crate::services::safety::{
    CreateSafetyRecordRequest, SafetyRecordListQuery, UpdateRectificationRequest,
};
use crate::{ApiResponse, AppState, ApiResult, CreatedResult};

#[utoipa::path(
    get,
    path = "/api/v1/safety/records",
    params(SafetyRecordListQuery),
    responses((status = 200, description = "Inspection records visible to the caller")),
    security(("bearer_auth" = [])),
    tag = "safety"
)]
pub async fn list_safety_records(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<SafetyRecordListQuery>,
) -> ApiResult<Vec<safety_record::Model>> {
    let records = state.services.safety.list_records(&ctx, query).await?;
    Ok(Json(ApiResponse::success(records)))
}

#[utoipa::path(
    post,
    path = "/api/v1/safety/records",
    request_body = CreateSafetyRecordRequest,
    responses(
        (status = 201, description = "Record created with caller as inspector"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "safety"
)]
pub async fn create_safety_record(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<CreateSafetyRecordRequest>,
) -> CreatedResult<safety_record::Model> {
    policy::ensure(
        &ctx,
        Action::CreateSafetyRecord,
        state.config.advance_policy(),
    )?;
    let record = state.services.safety.create_record(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

#[utoipa::path(
    put,
    path = "/api/v1/safety/records/{id}",
    params(("id" = i64, Path, description = "Safety record id")),
    request_body = UpdateRectificationRequest,
    responses(
        (status = 200, description = "Remediation updated"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "safety"
)]
pub async fn update_rectification(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRectificationRequest>,
) -> ApiResult<safety_record::Model> {
    policy::ensure(
        &ctx,
        Action::ManageSafetyRecords,
        state.config.advance_policy(),
    )?;
    let record = state.services.safety.update_rectification(id, req).await?;
    Ok(Json(ApiResponse::success(record)))
}
