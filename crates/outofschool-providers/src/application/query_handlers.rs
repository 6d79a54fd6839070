//! Query handlers for the Providers context.
//!
//! This module contains query handlers that load aggregates with their
//! contacts and return read-only view DTOs.

use chrono::{DateTime, Utc};
use outofschool_core::error::DomainError;
use outofschool_core::repository::AggregateStore;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{Position, Provider, Workshop};
use crate::domain::contacts::{Address, Contact, Phone};

/// Read-only view of a contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactView {
    /// The contact identifier.
    pub contact_id: Option<Uuid>,
    /// Contact title.
    pub title: String,
    /// Whether this is the default contact.
    pub is_default: bool,
    /// Postal address.
    pub address: Option<Address>,
    /// Phone numbers.
    pub phones: Vec<Phone>,
    /// E-mail addresses.
    pub emails: Vec<String>,
}

impl From<&Contact> for ContactView {
    fn from(contact: &Contact) -> Self {
        Self {
            contact_id: contact.id,
            title: contact.title.clone(),
            is_default: contact.is_default,
            address: contact.address.clone(),
            phones: contact.phones.clone(),
            emails: contact.emails.clone(),
        }
    }
}

fn contact_views(contacts: &[Contact]) -> Vec<ContactView> {
    contacts.iter().map(ContactView::from).collect()
}

/// Read-only view of a provider aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderView {
    /// The provider identifier.
    pub provider_id: Uuid,
    /// Registered full title.
    pub full_title: String,
    /// Short display title.
    pub short_title: String,
    /// Public e-mail.
    pub email: String,
    /// Contacts in stored order.
    pub contacts: Vec<ContactView>,
    /// Current version.
    pub version: i64,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Provider> for ProviderView {
    fn from(provider: &Provider) -> Self {
        Self {
            provider_id: provider.id,
            full_title: provider.full_title.clone(),
            short_title: provider.short_title.clone(),
            email: provider.email.clone(),
            contacts: contact_views(&provider.contacts),
            version: provider.version,
            updated_at: provider.updated_at,
        }
    }
}

/// Read-only view of a workshop aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct WorkshopView {
    /// The workshop identifier.
    pub workshop_id: Uuid,
    /// The provider running the workshop.
    pub provider_id: Uuid,
    /// Workshop title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Contacts in stored order.
    pub contacts: Vec<ContactView>,
    /// Current version.
    pub version: i64,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Workshop> for WorkshopView {
    fn from(workshop: &Workshop) -> Self {
        Self {
            workshop_id: workshop.id,
            provider_id: workshop.provider_id,
            title: workshop.title.clone(),
            description: workshop.description.clone(),
            contacts: contact_views(&workshop.contacts),
            version: workshop.version,
            updated_at: workshop.updated_at,
        }
    }
}

/// Read-only view of a position aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct PositionView {
    /// The position identifier.
    pub position_id: Uuid,
    /// The provider offering the position.
    pub provider_id: Uuid,
    /// Position name.
    pub full_title: String,
    /// Department the position belongs to.
    pub department: Option<String>,
    /// Contacts in stored order.
    pub contacts: Vec<ContactView>,
    /// Current version.
    pub version: i64,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Position> for PositionView {
    fn from(position: &Position) -> Self {
        Self {
            position_id: position.id,
            provider_id: position.provider_id,
            full_title: position.full_title.clone(),
            department: position.department.clone(),
            contacts: contact_views(&position.contacts),
            version: position.version,
            updated_at: position.updated_at,
        }
    }
}

/// Retrieves a provider with its contacts.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no provider has this ID.
pub async fn get_provider_by_id(
    provider_id: Uuid,
    store: &dyn AggregateStore<Provider>,
) -> Result<ProviderView, DomainError> {
    store
        .load_with_children(provider_id)
        .await?
        .map(|provider| ProviderView::from(&provider))
        .ok_or(DomainError::AggregateNotFound(provider_id))
}

/// Retrieves a workshop with its contacts.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no workshop has this ID.
pub async fn get_workshop_by_id(
    workshop_id: Uuid,
    store: &dyn AggregateStore<Workshop>,
) -> Result<WorkshopView, DomainError> {
    store
        .load_with_children(workshop_id)
        .await?
        .map(|workshop| WorkshopView::from(&workshop))
        .ok_or(DomainError::AggregateNotFound(workshop_id))
}

/// Retrieves a position with its contacts.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no position has this ID.
pub async fn get_position_by_id(
    position_id: Uuid,
    store: &dyn AggregateStore<Position>,
) -> Result<PositionView, DomainError> {
    store
        .load_with_children(position_id)
        .await?
        .map(|position| PositionView::from(&position))
        .ok_or(DomainError::AggregateNotFound(position_id))
}

#[cfg(test)]
mod tests {
    use outofschool_core::error::DomainError;
    use outofschool_test_support::{FailingAggregateStore, InMemoryAggregateStore};
    use uuid::Uuid;

    use super::*;
    use crate::domain::contacts::fixtures::default_contact;

    #[tokio::test]
    async fn test_get_provider_by_id_returns_view_with_contacts() {
        // Arrange
        let provider_id = Uuid::new_v4();
        let mut provider = Provider::new(provider_id);
        provider.version = 2;
        provider.short_title = "Sunrise".to_owned();
        provider.contacts = vec![Contact {
            id: Some(Uuid::new_v4()),
            owner_id: Some(provider_id),
            ..default_contact("Office")
        }];
        let store = InMemoryAggregateStore::with_aggregates([provider]);

        // Act
        let view = get_provider_by_id(provider_id, &store).await.unwrap();

        // Assert
        assert_eq!(view.provider_id, provider_id);
        assert_eq!(view.version, 2);
        assert_eq!(view.contacts.len(), 1);
        assert!(view.contacts[0].is_default);
    }

    #[tokio::test]
    async fn test_get_workshop_by_id_returns_not_found() {
        let store = InMemoryAggregateStore::<Workshop>::new();
        let workshop_id = Uuid::new_v4();

        let result = get_workshop_by_id(workshop_id, &store).await;

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, workshop_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_position_by_id_propagates_infrastructure_error() {
        let result = get_position_by_id(Uuid::new_v4(), &FailingAggregateStore).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
