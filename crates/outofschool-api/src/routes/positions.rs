//! Routes for positions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use outofschool_providers::application::query_handlers::PositionView;
use outofschool_providers::application::{command_handlers, query_handlers};
use outofschool_providers::domain::commands;

use crate::error::ApiError;
use crate::routes::contacts::{ContactRequest, into_contacts};
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreatePositionRequest {
    /// The provider offering the position.
    pub provider_id: Uuid,
    /// Position name.
    pub full_title: String,
    /// Department the position belongs to.
    pub department: Option<String>,
    /// Initial contacts.
    #[serde(default)]
    pub contacts: Vec<ContactRequest>,
}

/// Request body for PUT /{position_id}.
#[derive(Debug, Deserialize)]
pub struct UpdatePositionRequest {
    /// The version the client last read.
    pub expected_version: Option<i64>,
    /// Position name.
    pub full_title: String,
    /// Department the position belongs to.
    pub department: Option<String>,
    /// Desired contacts; omitted contacts are deleted.
    #[serde(default)]
    pub contacts: Vec<ContactRequest>,
}

/// POST /
#[instrument(skip(state, request), fields(provider_id = %request.provider_id))]
async fn create_position(
    State(state): State<AppState>,
    Json(request): Json<CreatePositionRequest>,
) -> Result<(StatusCode, Json<PositionView>), ApiError> {
    let command = commands::CreatePosition {
        correlation_id: Uuid::new_v4(),
        provider_id: request.provider_id,
        full_title: request.full_title,
        department: request.department,
        contacts: into_contacts(request.contacts),
    };

    info!(correlation_id = %command.correlation_id, "handling create_position command");

    let view = command_handlers::handle_create_position(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.positions,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /{position_id}
#[instrument(skip(state, request), fields(position_id = %position_id))]
async fn update_position(
    State(state): State<AppState>,
    Path(position_id): Path<Uuid>,
    Json(request): Json<UpdatePositionRequest>,
) -> Result<Json<PositionView>, ApiError> {
    let command = commands::UpdatePosition {
        correlation_id: Uuid::new_v4(),
        position_id,
        expected_version: request.expected_version,
        full_title: request.full_title,
        department: request.department,
        contacts: into_contacts(request.contacts),
    };

    info!(correlation_id = %command.correlation_id, "handling update_position command");

    let view = command_handlers::handle_update_position(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.positions,
    )
    .await?;

    Ok(Json(view))
}

/// GET /{position_id}
#[instrument(skip(state), fields(position_id = %position_id))]
async fn get_position(
    State(state): State<AppState>,
    Path(position_id): Path<Uuid>,
) -> Result<Json<PositionView>, ApiError> {
    let view = query_handlers::get_position_by_id(position_id, &*state.positions).await?;
    Ok(Json(view))
}

/// Returns the router for positions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_position))
        .route("/{position_id}", get(get_position).put(update_position))
}
