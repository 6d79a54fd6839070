//! Helpers for route tests: in-memory stores behind a lazily connected pool.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use outofschool_competitions::domain::aggregates::CompetitiveEvent;
use outofschool_providers::domain::aggregates::{Position, Provider, Workshop};
use outofschool_study_subjects::domain::aggregates::StudySubject;
use outofschool_test_support::{FixedClock, InMemoryAggregateStore, SequenceIdGenerator};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use crate::state::AppState;

/// The in-memory stores behind a test `AppState`.
pub(crate) struct MemoryStores {
    pub providers: Arc<InMemoryAggregateStore<Provider>>,
    pub workshops: Arc<InMemoryAggregateStore<Workshop>>,
    pub positions: Arc<InMemoryAggregateStore<Position>>,
    pub competitive_events: Arc<InMemoryAggregateStore<CompetitiveEvent>>,
    pub study_subjects: Arc<InMemoryAggregateStore<StudySubject>>,
}

pub(crate) fn memory_state() -> (AppState, MemoryStores) {
    let stores = MemoryStores {
        providers: Arc::new(InMemoryAggregateStore::new()),
        workshops: Arc::new(InMemoryAggregateStore::new()),
        positions: Arc::new(InMemoryAggregateStore::new()),
        competitive_events: Arc::new(InMemoryAggregateStore::new()),
        study_subjects: Arc::new(InMemoryAggregateStore::new()),
    };
    let state = AppState {
        db_pool: PgPool::connect_lazy("postgres://localhost/test").unwrap(),
        clock: Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        )),
        ids: Arc::new(SequenceIdGenerator::starting_at(1)),
        providers: stores.providers.clone(),
        workshops: stores.workshops.clone(),
        positions: stores.positions.clone(),
        competitive_events: stores.competitive_events.clone(),
        study_subjects: stores.study_subjects.clone(),
    };
    (state, stores)
}

/// Sends a request and returns the status with the JSON body, or
/// `Value::Null` when the body is not JSON.
pub(crate) async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(serde_json::to_vec(body).unwrap())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
