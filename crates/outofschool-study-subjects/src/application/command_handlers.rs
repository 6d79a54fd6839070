//! Command handlers for the Study Subjects context.

use outofschool_core::clock::Clock;
use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::AggregateStore;
use outofschool_reconcile::reconciler::AggregateReconciler;
use tracing::{info, instrument};

use crate::application::query_handlers::StudySubjectView;
use crate::domain::aggregates::{StudySubject, StudySubjectChanges};
use crate::domain::commands::{CreateStudySubject, UpdateStudySubject};

/// Handles the `CreateStudySubject` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the languages do not have exactly
/// one primary, or the store's error if the insert fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_create_study_subject(
    command: &CreateStudySubject,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<StudySubject>,
) -> Result<StudySubjectView, DomainError> {
    let desired = StudySubjectChanges {
        title: command.title.clone(),
        languages: command.languages.clone(),
    };
    let subject = AggregateReconciler::new(store, clock, ids)
        .create(StudySubject::new(ids.next_id()), desired)
        .await?;

    info!(study_subject_id = %subject.id, "study subject created");
    Ok(StudySubjectView::from(&subject))
}

/// Handles the `UpdateStudySubject` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the subject does not exist,
/// `DomainError::ConcurrencyConflict` if it changed underneath the caller,
/// `DomainError::Validation` if the languages do not have exactly one
/// primary, or `DomainError::Infrastructure` if persistence fails.
#[instrument(skip_all, fields(
    correlation_id = %command.correlation_id,
    study_subject_id = %command.study_subject_id,
))]
pub async fn handle_update_study_subject(
    command: &UpdateStudySubject,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<StudySubject>,
) -> Result<StudySubjectView, DomainError> {
    let desired = StudySubjectChanges {
        title: command.title.clone(),
        languages: command.languages.clone(),
    };
    let subject = AggregateReconciler::new(store, clock, ids)
        .reconcile_existing(command.study_subject_id, command.expected_version, desired)
        .await?;

    Ok(StudySubjectView::from(&subject))
}
