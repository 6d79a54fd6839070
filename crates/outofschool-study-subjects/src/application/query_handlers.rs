//! Query handlers for the Study Subjects context.

use chrono::{DateTime, Utc};
use outofschool_core::error::DomainError;
use outofschool_core::repository::AggregateStore;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::StudySubject;
use crate::domain::languages::SubjectLanguage;

/// Read-only view of a subject language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectLanguageView {
    /// The language identifier.
    pub language_id: Option<Uuid>,
    /// Whether this is the primary language.
    pub is_primary: bool,
}

impl From<&SubjectLanguage> for SubjectLanguageView {
    fn from(language: &SubjectLanguage) -> Self {
        Self {
            language_id: language.language_id,
            is_primary: language.is_primary,
        }
    }
}

/// Read-only view of a study subject aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct StudySubjectView {
    /// The study subject identifier.
    pub study_subject_id: Uuid,
    /// Subject title.
    pub title: String,
    /// Languages in stored order.
    pub languages: Vec<SubjectLanguageView>,
    /// Current version.
    pub version: i64,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&StudySubject> for StudySubjectView {
    fn from(subject: &StudySubject) -> Self {
        Self {
            study_subject_id: subject.id,
            title: subject.title.clone(),
            languages: subject
                .languages
                .iter()
                .map(SubjectLanguageView::from)
                .collect(),
            version: subject.version,
            updated_at: subject.updated_at,
        }
    }
}

/// Retrieves a study subject with its languages.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no subject has this ID.
pub async fn get_study_subject_by_id(
    study_subject_id: Uuid,
    store: &dyn AggregateStore<StudySubject>,
) -> Result<StudySubjectView, DomainError> {
    store
        .load_with_children(study_subject_id)
        .await?
        .map(|subject| StudySubjectView::from(&subject))
        .ok_or(DomainError::AggregateNotFound(study_subject_id))
}
