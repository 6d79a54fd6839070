//! Query handlers for the Competitive Events context.

use chrono::{DateTime, Utc};
use outofschool_core::error::DomainError;
use outofschool_core::repository::AggregateStore;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::CompetitiveEvent;
use crate::domain::judges::{DescriptionItem, Judge};

/// Read-only view of a judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeView {
    /// The judge identifier.
    pub judge_id: Option<Uuid>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the judge chairs the panel.
    pub is_chief: bool,
    /// Short biography.
    pub description: String,
}

impl From<&Judge> for JudgeView {
    fn from(judge: &Judge) -> Self {
        Self {
            judge_id: judge.id,
            first_name: judge.first_name.clone(),
            last_name: judge.last_name.clone(),
            is_chief: judge.is_chief,
            description: judge.description.clone(),
        }
    }
}

/// Read-only view of a description section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionItemView {
    /// The item identifier.
    pub description_item_id: Option<Uuid>,
    /// Section heading.
    pub section_name: String,
    /// Section body.
    pub description: String,
}

impl From<&DescriptionItem> for DescriptionItemView {
    fn from(item: &DescriptionItem) -> Self {
        Self {
            description_item_id: item.id,
            section_name: item.section_name.clone(),
            description: item.description.clone(),
        }
    }
}

/// Read-only view of a competitive event aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct CompetitiveEventView {
    /// The competitive event identifier.
    pub competitive_event_id: Uuid,
    /// Event title.
    pub title: String,
    /// Short summary.
    pub description: String,
    /// Scheduled start.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Judging panel in stored order.
    pub judges: Vec<JudgeView>,
    /// Description sections in stored order.
    pub description_items: Vec<DescriptionItemView>,
    /// Current version.
    pub version: i64,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&CompetitiveEvent> for CompetitiveEventView {
    fn from(event: &CompetitiveEvent) -> Self {
        Self {
            competitive_event_id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            scheduled_at: event.scheduled_at,
            judges: event.judges.iter().map(JudgeView::from).collect(),
            description_items: event
                .description_items
                .iter()
                .map(DescriptionItemView::from)
                .collect(),
            version: event.version,
            updated_at: event.updated_at,
        }
    }
}

/// Retrieves a competitive event with its judges and description items.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no event has this ID.
pub async fn get_competitive_event_by_id(
    competitive_event_id: Uuid,
    store: &dyn AggregateStore<CompetitiveEvent>,
) -> Result<CompetitiveEventView, DomainError> {
    store
        .load_with_children(competitive_event_id)
        .await?
        .map(|event| CompetitiveEventView::from(&event))
        .ok_or(DomainError::AggregateNotFound(competitive_event_id))
}

#[cfg(test)]
mod tests {
    use outofschool_test_support::InMemoryAggregateStore;

    use super::*;

    #[tokio::test]
    async fn test_get_competitive_event_by_id_returns_both_collections() {
        // Arrange
        let event_id = Uuid::new_v4();
        let mut event = CompetitiveEvent::new(event_id);
        event.version = 3;
        event.judges = vec![Judge {
            id: Some(Uuid::new_v4()),
            competitive_event_id: Some(event_id),
            is_chief: true,
            ..Judge::new("Olena", "Shevchenko")
        }];
        event.description_items = vec![DescriptionItem {
            id: Some(Uuid::new_v4()),
            competitive_event_id: Some(event_id),
            ..DescriptionItem::new("Rules", "Swiss system, 7 rounds")
        }];
        let store = InMemoryAggregateStore::with_aggregates([event]);

        // Act
        let view = get_competitive_event_by_id(event_id, &store).await.unwrap();

        // Assert
        assert_eq!(view.version, 3);
        assert!(view.judges[0].is_chief);
        assert_eq!(view.description_items[0].section_name, "Rules");
    }

    #[tokio::test]
    async fn test_get_competitive_event_by_id_returns_not_found() {
        let store = InMemoryAggregateStore::<CompetitiveEvent>::new();
        let event_id = Uuid::new_v4();

        let result = get_competitive_event_by_id(event_id, &store).await;

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, event_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }
}
