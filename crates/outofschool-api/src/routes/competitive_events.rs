//! Routes for the Competitive Events bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use outofschool_competitions::application::query_handlers::CompetitiveEventView;
use outofschool_competitions::application::{command_handlers, query_handlers};
use outofschool_competitions::domain::commands;
use outofschool_competitions::domain::judges::{DescriptionItem, Judge};

use crate::error::ApiError;
use crate::state::AppState;

/// A judge as sent by the client. Judges are matched by `id`; omit it to
/// add a new judge.
#[derive(Debug, Deserialize)]
pub struct JudgeRequest {
    /// Id of an existing judge.
    pub id: Option<Uuid>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the judge chairs the panel.
    #[serde(default)]
    pub is_chief: bool,
    /// Short biography.
    #[serde(default)]
    pub description: String,
}

impl From<JudgeRequest> for Judge {
    fn from(request: JudgeRequest) -> Self {
        Self {
            id: request.id,
            competitive_event_id: None,
            first_name: request.first_name,
            last_name: request.last_name,
            is_chief: request.is_chief,
            description: request.description,
        }
    }
}

/// A description section as sent by the client, matched by `id`.
#[derive(Debug, Deserialize)]
pub struct DescriptionItemRequest {
    /// Id of an existing section.
    pub id: Option<Uuid>,
    /// Section heading.
    pub section_name: String,
    /// Section body.
    pub description: String,
}

impl From<DescriptionItemRequest> for DescriptionItem {
    fn from(request: DescriptionItemRequest) -> Self {
        Self {
            id: request.id,
            competitive_event_id: None,
            section_name: request.section_name,
            description: request.description,
        }
    }
}

/// Request body for POST / and PUT /{competitive_event_id}.
#[derive(Debug, Deserialize)]
pub struct CompetitiveEventRequest {
    /// The version the client last read; ignored on create.
    pub expected_version: Option<i64>,
    /// Event title.
    pub title: String,
    /// Short summary.
    #[serde(default)]
    pub description: String,
    /// Scheduled start.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Judging panel.
    #[serde(default)]
    pub judges: Vec<JudgeRequest>,
    /// Description sections.
    #[serde(default)]
    pub description_items: Vec<DescriptionItemRequest>,
}

/// POST /
#[instrument(skip(state, request))]
async fn create_competitive_event(
    State(state): State<AppState>,
    Json(request): Json<CompetitiveEventRequest>,
) -> Result<(StatusCode, Json<CompetitiveEventView>), ApiError> {
    let command = commands::CreateCompetitiveEvent {
        correlation_id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        scheduled_at: request.scheduled_at,
        judges: request.judges.into_iter().map(Judge::from).collect(),
        description_items: request
            .description_items
            .into_iter()
            .map(DescriptionItem::from)
            .collect(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_competitive_event command");

    let view = command_handlers::handle_create_competitive_event(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.competitive_events,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /{competitive_event_id}
#[instrument(skip(state, request), fields(competitive_event_id = %competitive_event_id))]
async fn update_competitive_event(
    State(state): State<AppState>,
    Path(competitive_event_id): Path<Uuid>,
    Json(request): Json<CompetitiveEventRequest>,
) -> Result<Json<CompetitiveEventView>, ApiError> {
    let command = commands::UpdateCompetitiveEvent {
        correlation_id: Uuid::new_v4(),
        competitive_event_id,
        expected_version: request.expected_version,
        title: request.title,
        description: request.description,
        scheduled_at: request.scheduled_at,
        judges: request.judges.into_iter().map(Judge::from).collect(),
        description_items: request
            .description_items
            .into_iter()
            .map(DescriptionItem::from)
            .collect(),
    };

    info!(correlation_id = %command.correlation_id, "handling update_competitive_event command");

    let view = command_handlers::handle_update_competitive_event(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.competitive_events,
    )
    .await?;

    Ok(Json(view))
}

/// GET /{competitive_event_id}
#[instrument(skip(state), fields(competitive_event_id = %competitive_event_id))]
async fn get_competitive_event(
    State(state): State<AppState>,
    Path(competitive_event_id): Path<Uuid>,
) -> Result<Json<CompetitiveEventView>, ApiError> {
    let view =
        query_handlers::get_competitive_event_by_id(competitive_event_id, &*state.competitive_events)
            .await?;
    Ok(Json(view))
}

/// Returns the router for competitive events.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_competitive_event)).route(
        "/{competitive_event_id}",
        get(get_competitive_event).put(update_competitive_event),
    )
}
