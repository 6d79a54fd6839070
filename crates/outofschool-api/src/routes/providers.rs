//! Routes for providers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use outofschool_providers::application::query_handlers::ProviderView;
use outofschool_providers::application::{command_handlers, query_handlers};
use outofschool_providers::domain::commands;

use crate::error::ApiError;
use crate::routes::contacts::{ContactRequest, into_contacts};
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateProviderRequest {
    /// Registered full title.
    pub full_title: String,
    /// Short display title.
    pub short_title: String,
    /// Public e-mail.
    pub email: String,
    /// Initial contacts.
    #[serde(default)]
    pub contacts: Vec<ContactRequest>,
}

/// Request body for PUT /{provider_id}.
#[derive(Debug, Deserialize)]
pub struct UpdateProviderRequest {
    /// The version the client last read.
    pub expected_version: Option<i64>,
    /// Registered full title.
    pub full_title: String,
    /// Short display title.
    pub short_title: String,
    /// Public e-mail.
    pub email: String,
    /// Desired contacts; omitted contacts are deleted.
    #[serde(default)]
    pub contacts: Vec<ContactRequest>,
}

/// POST /
#[instrument(skip(state, request))]
async fn create_provider(
    State(state): State<AppState>,
    Json(request): Json<CreateProviderRequest>,
) -> Result<(StatusCode, Json<ProviderView>), ApiError> {
    let command = commands::CreateProvider {
        correlation_id: Uuid::new_v4(),
        full_title: request.full_title,
        short_title: request.short_title,
        email: request.email,
        contacts: into_contacts(request.contacts),
    };

    info!(correlation_id = %command.correlation_id, "handling create_provider command");

    let view = command_handlers::handle_create_provider(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.providers,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /{provider_id}
#[instrument(skip(state, request), fields(provider_id = %provider_id))]
async fn update_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<UpdateProviderRequest>,
) -> Result<Json<ProviderView>, ApiError> {
    let command = commands::UpdateProvider {
        correlation_id: Uuid::new_v4(),
        provider_id,
        expected_version: request.expected_version,
        full_title: request.full_title,
        short_title: request.short_title,
        email: request.email,
        contacts: into_contacts(request.contacts),
    };

    info!(correlation_id = %command.correlation_id, "handling update_provider command");

    let view = command_handlers::handle_update_provider(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.providers,
    )
    .await?;

    Ok(Json(view))
}

/// GET /{provider_id}
#[instrument(skip(state), fields(provider_id = %provider_id))]
async fn get_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<ProviderView>, ApiError> {
    let view = query_handlers::get_provider_by_id(provider_id, &*state.providers).await?;
    Ok(Json(view))
}

/// Returns the router for providers.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_provider))
        .route("/{provider_id}", get(get_provider).put(update_provider))
}
