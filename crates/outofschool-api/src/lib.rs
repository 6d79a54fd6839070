//! Out-of-School API — HTTP surface over the bounded contexts.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn build_router(app_state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the admin frontend's origin once it is deployed.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/providers", routes::providers::router())
        .nest("/api/v1/workshops", routes::workshops::router())
        .nest("/api/v1/positions", routes::positions::router())
        .nest(
            "/api/v1/competitive-events",
            routes::competitive_events::router(),
        )
        .nest("/api/v1/study-subjects", routes::study_subjects::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
