//! Command handlers for the Competitive Events context.

use outofschool_core::clock::Clock;
use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::AggregateStore;
use outofschool_reconcile::reconciler::AggregateReconciler;
use tracing::{info, instrument};

use crate::application::query_handlers::CompetitiveEventView;
use crate::domain::aggregates::{CompetitiveEvent, CompetitiveEventChanges};
use crate::domain::commands::{CreateCompetitiveEvent, UpdateCompetitiveEvent};

/// Handles the `CreateCompetitiveEvent` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if more than one judge is marked chief,
/// or the store's error if the insert fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_create_competitive_event(
    command: &CreateCompetitiveEvent,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<CompetitiveEvent>,
) -> Result<CompetitiveEventView, DomainError> {
    let desired = CompetitiveEventChanges {
        title: command.title.clone(),
        description: command.description.clone(),
        scheduled_at: command.scheduled_at,
        judges: command.judges.clone(),
        description_items: command.description_items.clone(),
    };
    let event = AggregateReconciler::new(store, clock, ids)
        .create(CompetitiveEvent::new(ids.next_id()), desired)
        .await?;

    info!(competitive_event_id = %event.id, "competitive event created");
    Ok(CompetitiveEventView::from(&event))
}

/// Handles the `UpdateCompetitiveEvent` command.
///
/// Judges and description items are reconciled in one unit of work: either
/// both collections are written or neither is.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the event does not exist,
/// `DomainError::ConcurrencyConflict` if it changed underneath the caller,
/// `DomainError::Validation` if more than one judge is marked chief, or
/// `DomainError::Infrastructure` if persistence fails.
#[instrument(skip_all, fields(
    correlation_id = %command.correlation_id,
    competitive_event_id = %command.competitive_event_id,
))]
pub async fn handle_update_competitive_event(
    command: &UpdateCompetitiveEvent,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<CompetitiveEvent>,
) -> Result<CompetitiveEventView, DomainError> {
    let desired = CompetitiveEventChanges {
        title: command.title.clone(),
        description: command.description.clone(),
        scheduled_at: command.scheduled_at,
        judges: command.judges.clone(),
        description_items: command.description_items.clone(),
    };
    let event = AggregateReconciler::new(store, clock, ids)
        .reconcile_existing(
            command.competitive_event_id,
            command.expected_version,
            desired,
        )
        .await?;

    Ok(CompetitiveEventView::from(&event))
}
