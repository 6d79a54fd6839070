//! Aggregate roots for the Study Subjects context.

use chrono::{DateTime, Utc};
use outofschool_core::aggregate::AggregateRoot;
use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::ChildWrite;
use outofschool_reconcile::reconciler::ReconcilableAggregate;
use uuid::Uuid;

use super::languages::{SubjectLanguage, language_rules};

/// Desired state of a study subject.
#[derive(Debug, Clone)]
pub struct StudySubjectChanges {
    /// Subject title.
    pub title: String,
    /// Desired languages.
    pub languages: Vec<SubjectLanguage>,
}

/// A subject taught by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySubject {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Optimistic concurrency token.
    pub version: i64,
    /// Subject title.
    pub title: String,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
    /// Owned language links.
    pub languages: Vec<SubjectLanguage>,
}

impl StudySubject {
    /// Creates an empty, unsaved study subject shell.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            title: String::new(),
            updated_at: None,
            languages: Vec::new(),
        }
    }

    /// Returns the primary language, if the subject has any languages.
    #[must_use]
    pub fn primary_language(&self) -> Option<Uuid> {
        self.languages
            .iter()
            .find(|language| language.is_primary)
            .and_then(|language| language.language_id)
    }
}

impl AggregateRoot for StudySubject {
    type Write = ChildWrite<SubjectLanguage>;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

impl ReconcilableAggregate for StudySubject {
    type Desired = StudySubjectChanges;

    fn reconcile(
        &mut self,
        desired: StudySubjectChanges,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<ChildWrite<SubjectLanguage>>, DomainError> {
        let applied = language_rules().reconcile(self.id, &self.languages, desired.languages, ids)?;
        self.title = desired.title;
        self.languages = applied.children;
        Ok(applied.writes)
    }
}
