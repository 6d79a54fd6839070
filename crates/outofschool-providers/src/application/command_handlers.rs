//! Command handlers for the Providers context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, reconcile contacts, persist the
//! unit of work, map back to a view.

use outofschool_core::clock::Clock;
use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::AggregateStore;
use outofschool_reconcile::reconciler::AggregateReconciler;
use tracing::{info, instrument};

use crate::application::query_handlers::{PositionView, ProviderView, WorkshopView};
use crate::domain::aggregates::{
    Position, PositionChanges, Provider, ProviderChanges, Workshop, WorkshopChanges,
};
use crate::domain::commands::{
    CreatePosition, CreateProvider, CreateWorkshop, UpdatePosition, UpdateProvider,
    UpdateWorkshop,
};

/// Handles the `CreateProvider` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the contacts are invalid, or the
/// store's error if the insert fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_create_provider(
    command: &CreateProvider,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<Provider>,
) -> Result<ProviderView, DomainError> {
    let desired = ProviderChanges {
        full_title: command.full_title.clone(),
        short_title: command.short_title.clone(),
        email: command.email.clone(),
        contacts: command.contacts.clone(),
    };
    let provider = AggregateReconciler::new(store, clock, ids)
        .create(Provider::new(ids.next_id()), desired)
        .await?;

    info!(provider_id = %provider.id, "provider created");
    Ok(ProviderView::from(&provider))
}

/// Handles the `UpdateProvider` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the provider does not exist,
/// `DomainError::ConcurrencyConflict` if it changed underneath the caller,
/// `DomainError::Validation` if the contacts are invalid, or
/// `DomainError::Infrastructure` if persistence fails.
#[instrument(skip_all, fields(
    correlation_id = %command.correlation_id,
    provider_id = %command.provider_id,
))]
pub async fn handle_update_provider(
    command: &UpdateProvider,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<Provider>,
) -> Result<ProviderView, DomainError> {
    let desired = ProviderChanges {
        full_title: command.full_title.clone(),
        short_title: command.short_title.clone(),
        email: command.email.clone(),
        contacts: command.contacts.clone(),
    };
    let provider = AggregateReconciler::new(store, clock, ids)
        .reconcile_existing(command.provider_id, command.expected_version, desired)
        .await?;

    Ok(ProviderView::from(&provider))
}

/// Handles the `CreateWorkshop` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the contacts are invalid, or the
/// store's error if the insert fails.
#[instrument(skip_all, fields(
    correlation_id = %command.correlation_id,
    provider_id = %command.provider_id,
))]
pub async fn handle_create_workshop(
    command: &CreateWorkshop,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<Workshop>,
) -> Result<WorkshopView, DomainError> {
    let desired = WorkshopChanges {
        title: command.title.clone(),
        description: command.description.clone(),
        contacts: command.contacts.clone(),
    };
    let workshop = AggregateReconciler::new(store, clock, ids)
        .create(Workshop::new(ids.next_id(), command.provider_id), desired)
        .await?;

    info!(workshop_id = %workshop.id, "workshop created");
    Ok(WorkshopView::from(&workshop))
}

/// Handles the `UpdateWorkshop` command.
///
/// # Errors
///
/// Same as [`handle_update_provider`].
#[instrument(skip_all, fields(
    correlation_id = %command.correlation_id,
    workshop_id = %command.workshop_id,
))]
pub async fn handle_update_workshop(
    command: &UpdateWorkshop,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<Workshop>,
) -> Result<WorkshopView, DomainError> {
    let desired = WorkshopChanges {
        title: command.title.clone(),
        description: command.description.clone(),
        contacts: command.contacts.clone(),
    };
    let workshop = AggregateReconciler::new(store, clock, ids)
        .reconcile_existing(command.workshop_id, command.expected_version, desired)
        .await?;

    Ok(WorkshopView::from(&workshop))
}

/// Handles the `CreatePosition` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the contacts are invalid, or the
/// store's error if the insert fails.
#[instrument(skip_all, fields(
    correlation_id = %command.correlation_id,
    provider_id = %command.provider_id,
))]
pub async fn handle_create_position(
    command: &CreatePosition,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<Position>,
) -> Result<PositionView, DomainError> {
    let desired = PositionChanges {
        full_title: command.full_title.clone(),
        department: command.department.clone(),
        contacts: command.contacts.clone(),
    };
    let position = AggregateReconciler::new(store, clock, ids)
        .create(Position::new(ids.next_id(), command.provider_id), desired)
        .await?;

    info!(position_id = %position.id, "position created");
    Ok(PositionView::from(&position))
}

/// Handles the `UpdatePosition` command.
///
/// # Errors
///
/// Same as [`handle_update_provider`].
#[instrument(skip_all, fields(
    correlation_id = %command.correlation_id,
    position_id = %command.position_id,
))]
pub async fn handle_update_position(
    command: &UpdatePosition,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn AggregateStore<Position>,
) -> Result<PositionView, DomainError> {
    let desired = PositionChanges {
        full_title: command.full_title.clone(),
        department: command.department.clone(),
        contacts: command.contacts.clone(),
    };
    let position = AggregateReconciler::new(store, clock, ids)
        .reconcile_existing(command.position_id, command.expected_version, desired)
        .await?;

    Ok(PositionView::from(&position))
}
