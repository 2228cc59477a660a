//! Safety inspection records, announcements, and order ratings.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use gasline_api::entities::{CylinderSpecs, CylinderStatus};
use serde_json::json;

async fn place_order(app: &TestApp, customer_token: &str) -> i64 {
    app.seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InStock)
        .await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "specs": "15kg",
                "quantity": 1,
                "address": "3 Kiln Row",
                "contact_name": "Bo Xu",
                "contact_phone": "19900001234"
            })),
            Some(customer_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["data"]["id"].as_i64().unwrap()
}

async fn complete_order(app: &TestApp, order_id: i64, courier_id: i64) {
    let admin = app.admin_token();
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{}/assign", order_id),
            Some(json!({ "courier_id": courier_id })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    for target in ["delivering", "completed"] {
        let response = app
            .request(
                Method::PUT,
                &format!("/api/v1/orders/{}/status", order_id),
                Some(json!({ "status": target })),
                Some(&admin),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

async fn file_record(app: &TestApp, token: &str, order_id: i64, hazard: &str) -> i64 {
    let response = app
        .request(
            Method::POST,
            "/api/v1/safety/records",
            Some(json!({
                "order_id": order_id,
                "check_items": { "valve": "ok", "hose": "worn" },
                "hazard_level": hazard,
                "hazard_description": "hose shows surface cracking",
                "photos": ["inspections/0001.jpg"]
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn inspection_is_attributed_to_the_caller() {
    let app = TestApp::new().await;
    let order_id = place_order(&app, &app.customer_token()).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/safety/records",
            Some(json!({ "order_id": order_id, "hazard_level": "medium" })),
            Some(&app.courier_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let data = &body["data"];
    assert_eq!(data["inspector_id"].as_i64(), Some(app.courier_id));
    assert_eq!(data["hazard_level"], "medium");
    // A finding opens a pending remediation item
    assert_eq!(data["rectify_status"], "pending");
}

#[tokio::test]
async fn clean_inspection_needs_no_rectification() {
    let app = TestApp::new().await;
    let order_id = place_order(&app, &app.customer_token()).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/safety/records",
            Some(json!({ "order_id": order_id, "hazard_level": "none" })),
            Some(&app.courier_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert!(body["data"]["rectify_status"].is_null());
}

#[tokio::test]
async fn inspection_requires_an_existing_order() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/safety/records",
            Some(json!({ "order_id": 424242, "hazard_level": "high" })),
            Some(&app.courier_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn record_listing_is_scoped_and_filterable() {
    let app = TestApp::new().await;
    let order_a = place_order(&app, &app.customer_token()).await;
    let order_b = place_order(&app, &app.customer2_token()).await;

    file_record(&app, &app.courier_token(), order_a, "high").await;
    file_record(&app, &app.courier2_token(), order_b, "low").await;

    // Staff see everything
    let response = app
        .request(Method::GET, "/api/v1/safety/records", None, Some(&app.station_token()))
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // A courier sees only their own inspections
    let response = app
        .request(Method::GET, "/api/v1/safety/records", None, Some(&app.courier_token()))
        .await;
    let body = response_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["inspector_id"].as_i64(), Some(app.courier_id));

    // A customer sees records filed against their orders
    let response = app
        .request(Method::GET, "/api/v1/safety/records", None, Some(&app.customer2_token()))
        .await;
    let body = response_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["order_id"].as_i64(), Some(order_b));

    // Hazard filter
    let response = app
        .request(
            Method::GET,
            "/api/v1/safety/records?hazard_level=high",
            None,
            Some(&app.admin_token()),
        )
        .await;
    let body = response_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["hazard_level"], "high");
}

#[tokio::test]
async fn rectification_updates_are_staff_only() {
    let app = TestApp::new().await;
    let order_id = place_order(&app, &app.customer_token()).await;
    let record_id = file_record(&app, &app.courier_token(), order_id, "high").await;

    let payload = json!({
        "rectify_status": "done",
        "rectify_photos": ["inspections/0002.jpg"]
    });

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/safety/records/{}", record_id),
            Some(payload.clone()),
            Some(&app.courier_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/safety/records/{}", record_id),
            Some(payload),
            Some(&app.station_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["rectify_status"], "done");
}

#[tokio::test]
async fn announcements_list_pinned_first() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    for (title, is_top) in [("First", false), ("Pinned", true), ("Second", false)] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/announcements",
                Some(json!({ "title": title, "content": "body", "is_top": is_top })),
                Some(&admin),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request(Method::GET, "/api/v1/announcements", None, Some(&app.customer_token()))
        .await;
    let body = response_json(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Pinned", "Second", "First"]);
}

#[tokio::test]
async fn announcement_update_and_delete() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let response = app
        .request(
            Method::POST,
            "/api/v1/announcements",
            Some(json!({ "title": "Price update", "content": "tbd" })),
            Some(&admin),
        )
        .await;
    let body = response_json(response).await;
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["author_id"].as_i64(), Some(app.admin_id));

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/announcements/{}", id),
            Some(json!({ "content": "15kg refills now 120", "is_top": true })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["content"], "15kg refills now 120");
    assert_eq!(body["data"]["is_top"], true);
    assert_eq!(body["data"]["title"], "Price update");

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/announcements/{}", id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/announcements/{}", id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_completed_orders_can_be_rated() {
    let app = TestApp::new().await;
    let order_id = place_order(&app, &app.customer_token()).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/ratings",
            Some(json!({ "order_id": order_id, "score": 4 })),
            Some(&app.customer_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("only completed orders"));
}

#[tokio::test]
async fn only_the_ordering_customer_may_rate() {
    let app = TestApp::new().await;
    let order_id = place_order(&app, &app.customer_token()).await;
    complete_order(&app, order_id, app.courier_id).await;

    for token in [app.customer2_token(), app.courier_token(), app.admin_token()] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/ratings",
                Some(json!({ "order_id": order_id })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn rating_lifecycle_and_duplicate_guard() {
    let app = TestApp::new().await;
    let order_id = place_order(&app, &app.customer_token()).await;
    complete_order(&app, order_id, app.courier_id).await;

    // Score defaults to 5 when omitted
    let response = app
        .request(
            Method::POST,
            "/api/v1/ratings",
            Some(json!({ "order_id": order_id, "comment": "quick delivery" })),
            Some(&app.customer_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["score"].as_i64(), Some(5));
    assert_eq!(body["data"]["customer_id"].as_i64(), Some(app.customer_id));

    // A second rating for the same order conflicts
    let response = app
        .request(
            Method::POST,
            "/api/v1/ratings",
            Some(json!({ "order_id": order_id, "score": 1 })),
            Some(&app.customer_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Visible on the order and in the listing
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/orders/{}/rating", order_id),
            None,
            Some(&app.courier_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["comment"], "quick delivery");

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/ratings?order_id={}", order_id),
            None,
            Some(&app.admin_token()),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn score_is_range_checked() {
    let app = TestApp::new().await;
    let order_id = place_order(&app, &app.customer_token()).await;
    complete_order(&app, order_id, app.courier_id).await;

    for score in [0, 6] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/ratings",
                Some(json!({ "order_id": order_id, "score": score })),
                Some(&app.customer_token()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/orders/{}/rating", order_id),
            None,
            Some(&app.customer_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
