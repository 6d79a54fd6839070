//! Aggregate roots for the Competitive Events context.

use chrono::{DateTime, Utc};
use outofschool_core::aggregate::AggregateRoot;
use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::ChildWrite;
use outofschool_reconcile::reconciler::ReconcilableAggregate;
use uuid::Uuid;

use super::judges::{DescriptionItem, Judge, description_item_rules, judge_rules};

/// A child write against either collection of a competitive event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompetitiveEventWrite {
    /// A judging panel change.
    Judge(ChildWrite<Judge>),
    /// A description section change.
    DescriptionItem(ChildWrite<DescriptionItem>),
}

/// Desired state of a competitive event.
#[derive(Debug, Clone)]
pub struct CompetitiveEventChanges {
    /// Event title.
    pub title: String,
    /// Short summary.
    pub description: String,
    /// Scheduled start.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Desired judging panel.
    pub judges: Vec<Judge>,
    /// Desired description sections.
    pub description_items: Vec<DescriptionItem>,
}

/// A competition hosted by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitiveEvent {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Optimistic concurrency token.
    pub version: i64,
    /// Event title.
    pub title: String,
    /// Short summary.
    pub description: String,
    /// Scheduled start.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
    /// Owned judging panel.
    pub judges: Vec<Judge>,
    /// Owned description sections.
    pub description_items: Vec<DescriptionItem>,
}

impl CompetitiveEvent {
    /// Creates an empty, unsaved competitive event shell.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            title: String::new(),
            description: String::new(),
            scheduled_at: None,
            updated_at: None,
            judges: Vec::new(),
            description_items: Vec::new(),
        }
    }

    /// Returns the chief judge, if any.
    #[must_use]
    pub fn chief_judge(&self) -> Option<&Judge> {
        self.judges.iter().find(|judge| judge.is_chief)
    }
}

impl AggregateRoot for CompetitiveEvent {
    type Write = CompetitiveEventWrite;

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

impl ReconcilableAggregate for CompetitiveEvent {
    type Desired = CompetitiveEventChanges;

    fn reconcile(
        &mut self,
        desired: CompetitiveEventChanges,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<CompetitiveEventWrite>, DomainError> {
        let judges = judge_rules().reconcile(self.id, &self.judges, desired.judges, ids)?;
        let items = description_item_rules().reconcile(
            self.id,
            &self.description_items,
            desired.description_items,
            ids,
        )?;

        self.title = desired.title;
        self.description = desired.description;
        self.scheduled_at = desired.scheduled_at;
        self.judges = judges.children;
        self.description_items = items.children;

        Ok(judges
            .writes
            .into_iter()
            .map(CompetitiveEventWrite::Judge)
            .chain(
                items
                    .writes
                    .into_iter()
                    .map(CompetitiveEventWrite::DescriptionItem),
            )
            .collect())
    }
}
