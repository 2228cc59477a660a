//! Cylinder CRUD, the stock-status cycle, and the delete guard.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use gasline_api::entities::{CylinderSpecs, CylinderStatus};
use serde_json::json;

async fn advance(
    app: &TestApp,
    token: &str,
    cylinder_id: i64,
    target: &str,
) -> axum::response::Response {
    app.request(
        Method::PUT,
        &format!("/api/v1/cylinders/{}/status", cylinder_id),
        Some(json!({ "status": target })),
        Some(token),
    )
    .await
}

#[tokio::test]
async fn creation_defaults_and_generated_serials() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/cylinders",
            Some(json!({ "specs": "5kg" })),
            Some(&app.station_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "in_stock");
    assert_eq!(body["data"]["specs"], "5kg");
    assert!(body["data"]["serial_code"]
        .as_str()
        .unwrap()
        .starts_with("CYL"));
}

#[tokio::test]
async fn duplicate_serials_conflict() {
    let app = TestApp::new().await;
    let payload = json!({ "specs": "15kg", "serial_code": "CYL-FIXED-01" });

    let response = app
        .request(
            Method::POST,
            "/api/v1/cylinders",
            Some(payload.clone()),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::POST,
            "/api/v1/cylinders",
            Some(payload),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn date_range_is_validated() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/cylinders",
            Some(json!({
                "specs": "50kg",
                "manufacture_date": "2030-01-01",
                "expiry_date": "2024-01-01"
            })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_cycle_and_abort_edge() {
    let app = TestApp::new().await;
    let id = app
        .seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InStock)
        .await;
    let token = app.courier_token();

    // Closed cycle in_stock -> delivering -> in_use -> empty -> in_stock
    for target in ["delivering", "in_use", "empty", "in_stock"] {
        let response = advance(&app, &token, id, target).await;
        assert_eq!(response.status(), StatusCode::OK, "edge to {}", target);
        let body = response_json(response).await;
        assert_eq!(body["data"]["status"], target);
    }

    // Abort edge delivering -> in_stock
    let response = advance(&app, &token, id, "delivering").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = advance(&app, &token, id, "in_stock").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn illegal_edges_are_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let in_stock = app
        .seed_cylinder(CylinderSpecs::Kg5, CylinderStatus::InStock)
        .await;
    for target in ["in_use", "empty", "in_stock"] {
        let response = advance(&app, &token, in_stock, target).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "edge to {}", target);
    }

    let in_use = app
        .seed_cylinder(CylinderSpecs::Kg5, CylinderStatus::InUse)
        .await;
    let response = advance(&app, &token, in_use, "in_stock").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = advance(&app, &token, 999_999, "delivering").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_guard_tracks_status() {
    let app = TestApp::new().await;
    let token = app.station_token();

    // In-stock cylinder deletes fine
    let id = app
        .seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InStock)
        .await;
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/cylinders/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Same cylinder in use fails with the in-use conflict error
    let id = app
        .seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InUse)
        .await;
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/cylinders/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("in use"));

    let id = app
        .seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::Empty)
        .await;
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/cylinders/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn edit_does_not_touch_status() {
    let app = TestApp::new().await;
    let id = app
        .seed_cylinder(CylinderSpecs::Kg50, CylinderStatus::InStock)
        .await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/cylinders/{}", id),
            Some(json!({ "manufacturer": "Northgas Works" })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["manufacturer"], "Northgas Works");
    assert_eq!(body["data"]["status"], "in_stock");
}

#[tokio::test]
async fn listing_filters_by_status_and_specs() {
    let app = TestApp::new().await;
    app.seed_cylinder(CylinderSpecs::Kg5, CylinderStatus::InStock)
        .await;
    app.seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InStock)
        .await;
    app.seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InUse)
        .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/cylinders?specs=15kg&status=in_stock",
            None,
            Some(&app.customer_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["specs"], "15kg");
    assert_eq!(rows[0]["status"], "in_stock");
}

#[tokio::test]
async fn stats_count_statuses_and_expiry_window() {
    let app = TestApp::new().await;
    app.seed_cylinder(CylinderSpecs::Kg5, CylinderStatus::InStock)
        .await;
    app.seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::Delivering)
        .await;
    app.seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InUse)
        .await;
    app.seed_cylinder_expiring(CylinderSpecs::Kg50, 10).await;
    app.seed_cylinder_expiring(CylinderSpecs::Kg50, 100).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/cylinders/stats",
            None,
            Some(&app.courier_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let data = &body["data"];
    assert_eq!(data["total"].as_u64(), Some(5));
    assert_eq!(data["in_stock"].as_u64(), Some(3));
    assert_eq!(data["delivering"].as_u64(), Some(1));
    assert_eq!(data["in_use"].as_u64(), Some(1));
    assert_eq!(data["empty"].as_u64(), Some(0));
    assert_eq!(data["expiring_soon"].as_u64(), Some(1));
}
