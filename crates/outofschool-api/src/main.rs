//! Out-of-School API server entry point.

use std::sync::Arc;

use outofschool_api::config::AppConfig;
use outofschool_api::error::AppError;
use outofschool_api::state::AppState;
use outofschool_api::{build_router, telemetry};
use outofschool_core::clock::SystemClock;
use outofschool_core::id::UuidV7Generator;
use outofschool_store::schema::MIGRATOR;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init_tracing(&config.telemetry)?;

    tracing::info!("Starting Out-of-School API server");

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    MIGRATOR.run(&pool).await?;

    let app_state = AppState::new(pool, Arc::new(SystemClock), Arc::new(UuidV7Generator));
    let app = build_router(app_state);

    // Start server.
    let addr = config.bind_address()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app).await;

    telemetry.shutdown();
    served?;
    Ok(())
}
