//! OpenAPI documentation, served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{CylinderSpecs, CylinderStatus, HazardLevel, OrderStatus, RectifyStatus, UserRole};
use crate::errors::ErrorResponse;
use crate::handlers;
use crate::services::analytics::{
    CourierRank, CylinderCounts, DashboardStats, OrderCounts, TrendPoint,
};
use crate::services::announcements::{CreateAnnouncementRequest, UpdateAnnouncementRequest};
use crate::services::cylinders::{
    AdvanceCylinderStatusRequest, CreateCylinderRequest, CylinderStats, UpdateCylinderRequest,
};
use crate::services::orders::{
    AdvanceOrderStatusRequest, AssignOrderRequest, CreateOrderRequest,
};
use crate::services::ratings::CreateRatingRequest;
use crate::services::safety::{CreateSafetyRecordRequest, UpdateRectificationRequest};
use crate::services::users::{CreateUserRequest, UpdateUserRequest};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GasLine API",
        description = "Gas-cylinder delivery coordination: inventory, orders, assignment, safety inspections"
    ),
    paths(
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::cylinders::list_cylinders,
        handlers::cylinders::create_cylinder,
        handlers::cylinders::update_cylinder,
        handlers::cylinders::advance_cylinder_status,
        handlers::cylinders::delete_cylinder,
        handlers::cylinders::cylinder_stats,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::assign_order,
        handlers::orders::advance_order_status,
        handlers::orders::get_order_rating,
        handlers::safety::list_safety_records,
        handlers::safety::create_safety_record,
        handlers::safety::update_rectification,
        handlers::stats::dashboard,
        handlers::stats::order_trend,
        handlers::stats::courier_ranking,
        handlers::announcements::list_announcements,
        handlers::announcements::create_announcement,
        handlers::announcements::update_announcement,
        handlers::announcements::delete_announcement,
        handlers::ratings::create_rating,
        handlers::ratings::list_ratings,
    ),
    components(schemas(
        ErrorResponse,
        UserRole,
        CylinderSpecs,
        CylinderStatus,
        OrderStatus,
        HazardLevel,
        RectifyStatus,
        CreateUserRequest,
        UpdateUserRequest,
        CreateCylinderRequest,
        UpdateCylinderRequest,
        AdvanceCylinderStatusRequest,
        CylinderStats,
        CreateOrderRequest,
        AssignOrderRequest,
        AdvanceOrderStatusRequest,
        CreateSafetyRecordRequest,
        UpdateRectificationRequest,
        CreateAnnouncementRequest,
        UpdateAnnouncementRequest,
        CreateRatingRequest,
        OrderCounts,
        CylinderCounts,
        DashboardStats,
        TrendPoint,
        CourierRank,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "User directory"),
        (name = "cylinders", description = "Cylinder inventory and lifecycle"),
        (name = "orders", description = "Order lifecycle"),
        (name = "safety", description = "Delivery safety inspections"),
        (name = "stats", description = "Dashboard aggregations"),
        (name = "announcements", description = "Station announcements"),
        (name = "ratings", description = "Order ratings"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
