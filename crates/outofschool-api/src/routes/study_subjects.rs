//! Routes for the Study Subjects bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use outofschool_study_subjects::application::query_handlers::StudySubjectView;
use outofschool_study_subjects::application::{command_handlers, query_handlers};
use outofschool_study_subjects::domain::commands;
use outofschool_study_subjects::domain::languages::SubjectLanguage;

use crate::error::ApiError;
use crate::state::AppState;

/// A language link as sent by the client.
#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    /// The language.
    pub language_id: Uuid,
    /// Whether the subject is primarily taught in it.
    #[serde(default)]
    pub is_primary: bool,
}

fn into_languages(requests: Vec<LanguageRequest>) -> Vec<SubjectLanguage> {
    requests
        .into_iter()
        .map(|request| SubjectLanguage::new(request.language_id, request.is_primary))
        .collect()
}

/// Request body for POST / and PUT /{study_subject_id}.
#[derive(Debug, Deserialize)]
pub struct StudySubjectRequest {
    /// The version the client last read; ignored on create.
    pub expected_version: Option<i64>,
    /// Subject title.
    pub title: String,
    /// Languages the subject is taught in.
    #[serde(default)]
    pub languages: Vec<LanguageRequest>,
}

/// POST /
#[instrument(skip(state, request))]
async fn create_study_subject(
    State(state): State<AppState>,
    Json(request): Json<StudySubjectRequest>,
) -> Result<(StatusCode, Json<StudySubjectView>), ApiError> {
    let command = commands::CreateStudySubject {
        correlation_id: Uuid::new_v4(),
        title: request.title,
        languages: into_languages(request.languages),
    };

    info!(correlation_id = %command.correlation_id, "handling create_study_subject command");

    let view = command_handlers::handle_create_study_subject(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.study_subjects,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /{study_subject_id}
#[instrument(skip(state, request), fields(study_subject_id = %study_subject_id))]
async fn update_study_subject(
    State(state): State<AppState>,
    Path(study_subject_id): Path<Uuid>,
    Json(request): Json<StudySubjectRequest>,
) -> Result<Json<StudySubjectView>, ApiError> {
    let command = commands::UpdateStudySubject {
        correlation_id: Uuid::new_v4(),
        study_subject_id,
        expected_version: request.expected_version,
        title: request.title,
        languages: into_languages(request.languages),
    };

    info!(correlation_id = %command.correlation_id, "handling update_study_subject command");

    let view = command_handlers::handle_update_study_subject(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.study_subjects,
    )
    .await?;

    Ok(Json(view))
}

/// GET /{study_subject_id}
#[instrument(skip(state), fields(study_subject_id = %study_subject_id))]
async fn get_study_subject(
    State(state): State<AppState>,
    Path(study_subject_id): Path<Uuid>,
) -> Result<Json<StudySubjectView>, ApiError> {
    let view =
        query_handlers::get_study_subject_by_id(study_subject_id, &*state.study_subjects).await?;
    Ok(Json(view))
}

/// Returns the router for study subjects.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_study_subject)).route(
        "/{study_subject_id}",
        get(get_study_subject).put(update_study_subject),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::routes::testing::{memory_state, send};

    #[tokio::test]
    async fn test_create_study_subject_returns_400_without_primary() {
        let (state, _stores) = memory_state();
        let body = json!({
            "title": "Mathematics",
            "languages": [{ "language_id": Uuid::new_v4() }]
        });

        let (status, json) = send(router().with_state(state), "POST", "/", Some(&body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Exactly one primary language must be specified."
        );
    }

    #[tokio::test]
    async fn test_create_study_subject_returns_400_for_nil_language_id() {
        let (state, stores) = memory_state();
        let body = json!({
            "title": "Mathematics",
            "languages": [{ "language_id": Uuid::nil(), "is_primary": true }]
        });

        let (status, json) = send(router().with_state(state), "POST", "/", Some(&body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Language must be specified for each study subject language."
        );
        assert!(stores.study_subjects.committed_units().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_get_study_subject() {
        // Arrange
        let (state, _stores) = memory_state();
        let language_id = Uuid::new_v4();
        let body = json!({
            "title": "Mathematics",
            "languages": [{ "language_id": language_id, "is_primary": true }]
        });

        // Act
        let (status, created) = send(router().with_state(state.clone()), "POST", "/", Some(&body)).await;
        let subject_id = created["study_subject_id"].as_str().unwrap().to_owned();
        let (_, fetched) =
            send(router().with_state(state), "GET", &format!("/{subject_id}"), None).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(fetched["languages"][0]["language_id"], language_id.to_string());
        assert_eq!(fetched["languages"][0]["is_primary"], true);
    }
}
