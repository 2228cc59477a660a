//! Test harness: application state over a throwaway SQLite file database,
//! with one seeded user and minted bearer token per role.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    middleware, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use gasline_api::{
    auth::{AuthVerifier, Claims},
    config::AppConfig,
    db,
    entities::{cylinder, user, CylinderSpecs, CylinderStatus, UserRole},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_SECRET: &str =
    "integration_test_secret_0123456789_abcdefghijklmnopqrstuvwxyz_0123456789";
const ISSUER: &str = "gasline-api";
const AUDIENCE: &str = "gasline-clients";

pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub admin_id: i64,
    pub station_id: i64,
    pub courier_id: i64,
    pub courier2_id: i64,
    pub customer_id: i64,
    pub customer2_id: i64,
    _db_dir: tempfile::TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Fresh application with the default permissive advancement policy.
    pub async fn new() -> Self {
        Self::build("permissive").await
    }

    pub async fn with_advance_policy(policy: &str) -> Self {
        Self::build(policy).await
    }

    async fn build(advance_policy: &str) -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("gasline_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            TEST_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.advance_policy = advance_policy.to_string();
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let mut ids = Vec::new();
        for (username, role) in [
            ("admin", UserRole::Admin),
            ("station", UserRole::Station),
            ("courier", UserRole::Courier),
            ("courier2", UserRole::Courier),
            ("customer", UserRole::Customer),
            ("customer2", UserRole::Customer),
        ] {
            let now = Utc::now();
            let seeded = user::ActiveModel {
                username: Set(username.to_string()),
                role: Set(role),
                phone: Set(None),
                real_name: Set(Some(format!("Seeded {}", username))),
                station_id: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db_arc.as_ref())
            .await
            .expect("seed user for tests");
            ids.push(seeded.id);
        }

        let services = Arc::new(AppServices::new(
            db_arc.clone(),
            Some(event_sender.clone()),
            cfg.advance_policy(),
        ));

        let verifier = Arc::new(AuthVerifier::new(TEST_SECRET, ISSUER, AUDIENCE));

        let cfg = Arc::new(cfg);
        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender: Some(event_sender),
            services,
        };

        let router = Router::new()
            .nest("/api/v1", gasline_api::api_v1_routes())
            .layer(middleware::from_fn_with_state(
                verifier,
                gasline_api::auth::inject_verifier,
            ))
            .layer(middleware::from_fn(
                gasline_api::request_id::propagate_request_id,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            admin_id: ids[0],
            station_id: ids[1],
            courier_id: ids[2],
            courier2_id: ids[3],
            customer_id: ids[4],
            customer2_id: ids[5],
            _db_dir: db_dir,
            _event_task: event_task,
        }
    }

    /// Mint a bearer token for an arbitrary subject and role string.
    pub fn mint_token(&self, sub: i64, role: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            username: Some(format!("user-{}", sub)),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            nbf: now.timestamp(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode test token")
    }

    pub fn admin_token(&self) -> String {
        self.mint_token(self.admin_id, "admin")
    }

    pub fn station_token(&self) -> String {
        self.mint_token(self.station_id, "station")
    }

    pub fn courier_token(&self) -> String {
        self.mint_token(self.courier_id, "courier")
    }

    pub fn courier2_token(&self) -> String {
        self.mint_token(self.courier2_id, "courier")
    }

    pub fn customer_token(&self) -> String {
        self.mint_token(self.customer_id, "customer")
    }

    pub fn customer2_token(&self) -> String {
        self.mint_token(self.customer2_id, "customer")
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Insert a cylinder row directly, bypassing the HTTP surface.
    pub async fn seed_cylinder(&self, specs: CylinderSpecs, status: CylinderStatus) -> i64 {
        let now = Utc::now();
        let seeded = cylinder::ActiveModel {
            serial_code: Set(format!("TST{}", Uuid::new_v4().simple())),
            specs: Set(specs),
            status: Set(status),
            manufacturer: Set(None),
            manufacture_date: Set(None),
            expiry_date: Set(None),
            last_check_date: Set(None),
            station_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed cylinder for tests");
        seeded.id
    }

    /// Insert an in-stock cylinder expiring `days_from_now` days from today.
    pub async fn seed_cylinder_expiring(
        &self,
        specs: CylinderSpecs,
        days_from_now: i64,
    ) -> i64 {
        let now = Utc::now();
        let expiry: NaiveDate = now.date_naive() + Duration::days(days_from_now);
        let seeded = cylinder::ActiveModel {
            serial_code: Set(format!("TST{}", Uuid::new_v4().simple())),
            specs: Set(specs),
            status: Set(CylinderStatus::InStock),
            manufacturer: Set(None),
            manufacture_date: Set(Some(now.date_naive() - Duration::days(365))),
            expiry_date: Set(Some(expiry)),
            last_check_date: Set(None),
            station_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed expiring cylinder for tests");
        seeded.id
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Decode a JSON response body.
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("response body bytes")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json response")
}
