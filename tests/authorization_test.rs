//! Authentication failures and the role matrix exercised over HTTP.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use gasline_api::entities::{CylinderSpecs, CylinderStatus};
use serde_json::json;

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/orders", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, "/api/v1/orders", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn tokens_signed_with_another_key_are_rejected() {
    let app = TestApp::new().await;

    // Same claim shape, wrong signing key.
    let claims = json!({
        "sub": "1",
        "role": "admin",
        "jti": "deadbeef",
        "iat": 1_700_000_000,
        "exp": 4_102_444_800i64,
        "nbf": 1_700_000_000,
        "iss": "gasline-api",
        "aud": "gasline-clients"
    });
    let forged = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"some_entirely_different_secret_key_material"),
    )
    .unwrap();

    let response = app
        .request(Method::GET, "/api/v1/orders", None, Some(&forged))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cylinder_mutations_are_staff_only() {
    let app = TestApp::new().await;
    let payload = json!({ "specs": "5kg" });

    for token in [app.customer_token(), app.courier_token()] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/cylinders",
                Some(payload.clone()),
                Some(&token),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    for token in [app.admin_token(), app.station_token()] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/cylinders",
                Some(payload.clone()),
                Some(&token),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Deletion under the same gate
    let id = app
        .seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InStock)
        .await;
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/cylinders/{}", id),
            None,
            Some(&app.courier_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn any_authenticated_actor_may_advance_cylinder_status() {
    let app = TestApp::new().await;

    for token in [
        app.customer_token(),
        app.courier_token(),
        app.station_token(),
        app.admin_token(),
    ] {
        let id = app
            .seed_cylinder(CylinderSpecs::Kg5, CylinderStatus::InStock)
            .await;
        let response = app
            .request(
                Method::PUT,
                &format!("/api/v1/cylinders/{}/status", id),
                Some(json!({ "status": "delivering" })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let app = TestApp::new().await;
    let payload = json!({ "username": "newcomer", "role": "courier" });

    // Station staff may list but not mutate
    let station = app.station_token();
    let response = app
        .request(Method::GET, "/api/v1/users", None, Some(&station))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .request(Method::POST, "/api/v1/users", Some(payload.clone()), Some(&station))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Customers may not even list
    let response = app
        .request(Method::GET, "/api/v1/users", None, Some(&app.customer_token()))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::POST,
            "/api/v1/users",
            Some(payload),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn announcement_mutations_are_admin_only() {
    let app = TestApp::new().await;
    let payload = json!({ "title": "Planned downtime", "content": "Sunday 02:00" });

    let response = app
        .request(
            Method::POST,
            "/api/v1/announcements",
            Some(payload.clone()),
            Some(&app.station_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::POST,
            "/api/v1/announcements",
            Some(payload),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Reading is open to everyone
    let response = app
        .request(
            Method::GET,
            "/api/v1/announcements",
            None,
            Some(&app.customer_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn assigned_order(app: &TestApp) -> i64 {
    app.seed_cylinder(CylinderSpecs::Kg15, CylinderStatus::InStock)
        .await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "specs": "15kg",
                "quantity": 1,
                "address": "7 Dock Lane",
                "contact_name": "Mei Song",
                "contact_phone": "18600001111"
            })),
            Some(&app.customer_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{}/assign", order_id),
            Some(json!({ "courier_id": app.courier_id })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    order_id
}

#[tokio::test]
async fn permissive_policy_lets_any_actor_advance_orders() {
    let app = TestApp::new().await;
    let order_id = assigned_order(&app).await;

    // An uninvolved courier may push the order along
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{}/status", order_id),
            Some(json!({ "status": "delivering" })),
            Some(&app.courier2_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // So may the other customer
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{}/status", order_id),
            Some(json!({ "status": "completed" })),
            Some(&app.customer2_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn assignee_only_policy_restricts_advancement() {
    let app = TestApp::with_advance_policy("assignee_only").await;
    let order_id = assigned_order(&app).await;
    let uri = format!("/api/v1/orders/{}/status", order_id);

    // Neither the other courier nor the ordering customer may advance
    for token in [app.courier2_token(), app.customer_token()] {
        let response = app
            .request(
                Method::PUT,
                &uri,
                Some(json!({ "status": "delivering" })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // The assignee may
    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({ "status": "delivering" })),
            Some(&app.courier_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Staff are always allowed
    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({ "status": "completed" })),
            Some(&app.station_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
