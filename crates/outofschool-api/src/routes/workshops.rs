//! Routes for workshops.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use outofschool_providers::application::query_handlers::WorkshopView;
use outofschool_providers::application::{command_handlers, query_handlers};
use outofschool_providers::domain::commands;

use crate::error::ApiError;
use crate::routes::contacts::{ContactRequest, into_contacts};
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateWorkshopRequest {
    /// The provider running the workshop.
    pub provider_id: Uuid,
    /// Workshop title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Initial contacts.
    #[serde(default)]
    pub contacts: Vec<ContactRequest>,
}

/// Request body for PUT /{workshop_id}.
#[derive(Debug, Deserialize)]
pub struct UpdateWorkshopRequest {
    /// The version the client last read.
    pub expected_version: Option<i64>,
    /// Workshop title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Desired contacts; omitted contacts are deleted.
    #[serde(default)]
    pub contacts: Vec<ContactRequest>,
}

/// POST /
#[instrument(skip(state, request), fields(provider_id = %request.provider_id))]
async fn create_workshop(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkshopRequest>,
) -> Result<(StatusCode, Json<WorkshopView>), ApiError> {
    let command = commands::CreateWorkshop {
        correlation_id: Uuid::new_v4(),
        provider_id: request.provider_id,
        title: request.title,
        description: request.description,
        contacts: into_contacts(request.contacts),
    };

    info!(correlation_id = %command.correlation_id, "handling create_workshop command");

    let view = command_handlers::handle_create_workshop(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.workshops,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /{workshop_id}
#[instrument(skip(state, request), fields(workshop_id = %workshop_id))]
async fn update_workshop(
    State(state): State<AppState>,
    Path(workshop_id): Path<Uuid>,
    Json(request): Json<UpdateWorkshopRequest>,
) -> Result<Json<WorkshopView>, ApiError> {
    let command = commands::UpdateWorkshop {
        correlation_id: Uuid::new_v4(),
        workshop_id,
        expected_version: request.expected_version,
        title: request.title,
        description: request.description,
        contacts: into_contacts(request.contacts),
    };

    info!(correlation_id = %command.correlation_id, "handling update_workshop command");

    let view = command_handlers::handle_update_workshop(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.workshops,
    )
    .await?;

    Ok(Json(view))
}

/// GET /{workshop_id}
#[instrument(skip(state), fields(workshop_id = %workshop_id))]
async fn get_workshop(
    State(state): State<AppState>,
    Path(workshop_id): Path<Uuid>,
) -> Result<Json<WorkshopView>, ApiError> {
    let view = query_handlers::get_workshop_by_id(workshop_id, &*state.workshops).await?;
    Ok(Json(view))
}

/// Returns the router for workshops.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_workshop))
        .route("/{workshop_id}", get(get_workshop).put(update_workshop))
}
