use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthContext;
use crate::entities::rating;
use crate::services::ratings::{CreateRatingRequest, RatingListQuery};
use crate::{ApiResponse, AppState, ApiResult, CreatedResult};

#[utoipa::path(
    post,
    path = "/api/v1/ratings",
    request_body = CreateRatingRequest,
    responses(
        (status = 201, description = "Rating created"),
        (status = 400, description = "Order not completed"),
        (status = 403, description = "Only the ordering customer may rate"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already rated")
    ),
    security(("bearer_auth" = [])),
    tag = "ratings"
)]
pub async fn create_rating(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<CreateRatingRequest>,
) -> CreatedResult<rating::Model> {
    let rating = state.services.ratings.create_rating(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rating))))
}

#[utoipa::path(
    get,
    path = "/api/v1/ratings",
    params(RatingListQuery),
    responses((status = 200, description = "Rating list")),
    security(("bearer_auth" = [])),
    tag = "ratings"
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    _ctx: AuthContext,
    Query(query): Query<RatingListQuery>,
) -> ApiResult<Vec<rating::Model>> {
    let ratings = state.services.ratings.list_ratings(query).await?;
    Ok(Json(ApiResponse::success(ratings)))
}
