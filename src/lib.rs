//! GasLine API Library
//!
//! Core functionality for the gas-cylinder delivery coordination service.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod request_id;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::handlers::AppServices;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: Arc<AppConfig>,
    pub event_sender: Option<Arc<EventSender>>,
    pub services: Arc<AppServices>,
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::request_id::current_request_id()
                .map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Result type for creation endpoints responding 201
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // User directory
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/:id",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        // Cylinder inventory
        .route(
            "/cylinders",
            get(handlers::cylinders::list_cylinders).post(handlers::cylinders::create_cylinder),
        )
        .route("/cylinders/stats", get(handlers::cylinders::cylinder_stats))
        .route(
            "/cylinders/:id",
            put(handlers::cylinders::update_cylinder)
                .delete(handlers::cylinders::delete_cylinder),
        )
        .route(
            "/cylinders/:id/status",
            put(handlers::cylinders::advance_cylinder_status),
        )
        // Orders
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/orders/:id", get(handlers::orders::get_order))
        .route("/orders/:id/assign", put(handlers::orders::assign_order))
        .route(
            "/orders/:id/status",
            put(handlers::orders::advance_order_status),
        )
        .route("/orders/:id/rating", get(handlers::orders::get_order_rating))
        // Safety inspections
        .route(
            "/safety/records",
            get(handlers::safety::list_safety_records)
                .post(handlers::safety::create_safety_record),
        )
        .route(
            "/safety/records/:id",
            put(handlers::safety::update_rectification),
        )
        // Dashboard statistics
        .route("/stats/dashboard", get(handlers::stats::dashboard))
        .route("/stats/orders/trend", get(handlers::stats::order_trend))
        .route(
            "/stats/delivery/ranking",
            get(handlers::stats::courier_ranking),
        )
        // Announcements
        .route(
            "/announcements",
            get(handlers::announcements::list_announcements)
                .post(handlers::announcements::create_announcement),
        )
        .route(
            "/announcements/:id",
            put(handlers::announcements::update_announcement)
                .delete(handlers::announcements::delete_announcement),
        )
        // Ratings
        .route(
            "/ratings",
            get(handlers::ratings::list_ratings).post(handlers::ratings::create_rating),
        )
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let git = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "git": git,
        "build_time": build_time,
        "service": "gasline-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
