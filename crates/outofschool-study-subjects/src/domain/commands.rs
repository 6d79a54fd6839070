//! Commands for the Study Subjects context.

use uuid::Uuid;

use super::languages::SubjectLanguage;

/// Command to add a study subject.
#[derive(Debug, Clone)]
pub struct CreateStudySubject {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Subject title.
    pub title: String,
    /// Languages the subject is taught in.
    pub languages: Vec<SubjectLanguage>,
}

/// Command to update a study subject and reconcile its languages.
#[derive(Debug, Clone)]
pub struct UpdateStudySubject {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The study subject identifier.
    pub study_subject_id: Uuid,
    /// The version the caller last read, if it wants a stale-write check.
    pub expected_version: Option<i64>,
    /// Subject title.
    pub title: String,
    /// Desired languages.
    pub languages: Vec<SubjectLanguage>,
}
