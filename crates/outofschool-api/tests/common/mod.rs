//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use outofschool_core::clock::Clock;
use outofschool_core::id::{IdGenerator, UuidV7Generator};
use outofschool_test_support::FixedClock;
use sqlx::PgPool;
use tower::ServiceExt;

use outofschool_api::build_router;
use outofschool_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over Postgres stores with a fixed clock.
/// Uses the same router as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let ids: Arc<dyn IdGenerator> = Arc::new(UuidV7Generator);
    build_router(AppState::new(pool, fixed_clock(), ids))
}

/// Build the app over a pool that never connects, for routes that do not
/// touch the database.
pub fn build_offline_app() -> Router {
    build_test_app(PgPool::connect_lazy("postgres://localhost/test").unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a request with a JSON body and return the response.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
