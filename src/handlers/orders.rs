use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthContext;
use crate::entities::{order, rating};
use crate::services::orders::{
    AdvanceOrderStatusRequest, AssignOrderRequest, CreateOrderRequest, OrderListQuery,
};
use crate::{ApiResponse, AppState, ApiResult, CreatedResult};

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderListQuery),
    responses((status = 200, description = "Orders visible to the caller")),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Vec<order::Model>> {
    let orders = state.services.orders.list_orders(&ctx, query).await?;
    Ok(Json(ApiResponse::success(orders)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail"),
        (status = 403, description = "Not a party to this order"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<order::Model> {
    let order = state.services.orders.get_order(&ctx, id).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created"),
        (status = 400, description = "Validation failed"),
        (status = 422, description = "Insufficient stock")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<CreateOrderRequest>,
) -> CreatedResult<order::Model> {
    let order = state.services.orders.create_order(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/assign",
    params(("id" = i64, Path, description = "Order id")),
    request_body = AssignOrderRequest,
    responses(
        (status = 200, description = "Courier assigned"),
        (status = 400, description = "Order not pending or assignee not a courier"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn assign_order(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<AssignOrderRequest>,
) -> ApiResult<order::Model> {
    let order = state
        .services
        .orders
        .assign_order(&ctx, id, req.courier_id)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = i64, Path, description = "Order id")),
    request_body = AdvanceOrderStatusRequest,
    responses(
        (status = 200, description = "Status advanced"),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn advance_order_status(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<AdvanceOrderStatusRequest>,
) -> ApiResult<order::Model> {
    let order = state
        .services
        .orders
        .advance_status(&ctx, id, req.status)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/rating",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Rating for the order"),
        (status = 404, description = "Order or rating not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order_rating(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<rating::Model> {
    let rating = state.services.ratings.get_for_order(&ctx, id).await?;
    Ok(Json(ApiResponse::success(rating)))
}
