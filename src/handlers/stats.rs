use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::AuthContext;
use crate::services::analytics::{CourierRank, DashboardStats, TrendPoint};
use crate::{ApiResponse, AppState, ApiResult};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TrendQuery {
    /// Trailing window in days; falls back to the configured default.
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RankingQuery {
    /// Maximum entries returned; falls back to the configured default.
    pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/dashboard",
    responses((status = 200, description = "Dashboard counts and revenue", body = DashboardStats)),
    security(("bearer_auth" = [])),
    tag = "stats"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _ctx: AuthContext,
) -> ApiResult<DashboardStats> {
    let stats = state.services.analytics.dashboard().await?;
    Ok(Json(ApiResponse::success(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/orders/trend",
    params(TrendQuery),
    responses((status = 200, description = "Per-day order counts, ascending dates")),
    security(("bearer_auth" = [])),
    tag = "stats"
)]
pub async fn order_trend(
    State(state): State<AppState>,
    _ctx: AuthContext,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Vec<TrendPoint>> {
    let days = query.days.unwrap_or(state.config.trend_default_days);
    let trend = state.services.analytics.order_trend(days).await?;
    Ok(Json(ApiResponse::success(trend)))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/delivery/ranking",
    params(RankingQuery),
    responses((status = 200, description = "Couriers by completed deliveries")),
    security(("bearer_auth" = [])),
    tag = "stats"
)]
pub async fn courier_ranking(
    State(state): State<AppState>,
    _ctx: AuthContext,
    Query(query): Query<RankingQuery>,
) -> ApiResult<Vec<CourierRank>> {
    let limit = query.limit.unwrap_or(state.config.ranking_default_limit);
    let ranking = state.services.analytics.courier_ranking(limit).await?;
    Ok(Json(ApiResponse::success(ranking)))
}
