//! Aggregate roots for the Providers context.

use chrono::{DateTime, Utc};
use outofschool_core::aggregate::AggregateRoot;
use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::ChildWrite;
use outofschool_reconcile::reconciler::ReconcilableAggregate;
use uuid::Uuid;

use super::contacts::{Contact, contact_rules};

/// Desired state of a provider.
#[derive(Debug, Clone)]
pub struct ProviderChanges {
    /// Registered full title.
    pub full_title: String,
    /// Short display title.
    pub short_title: String,
    /// Public e-mail.
    pub email: String,
    /// Desired contact list.
    pub contacts: Vec<Contact>,
}

/// An education provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Optimistic concurrency token.
    pub version: i64,
    /// Registered full title.
    pub full_title: String,
    /// Short display title.
    pub short_title: String,
    /// Public e-mail.
    pub email: String,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
    /// Owned contacts.
    pub contacts: Vec<Contact>,
}

impl Provider {
    /// Creates an empty, unsaved provider shell.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            full_title: String::new(),
            short_title: String::new(),
            email: String::new(),
            updated_at: None,
            contacts: Vec::new(),
        }
    }
}

impl AggregateRoot for Provider {
    type Write = ChildWrite<Contact>;

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

impl ReconcilableAggregate for Provider {
    type Desired = ProviderChanges;

    fn reconcile(
        &mut self,
        desired: ProviderChanges,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<ChildWrite<Contact>>, DomainError> {
        let contacts = contact_rules().reconcile(self.id, &self.contacts, desired.contacts, ids)?;

        self.full_title = desired.full_title;
        self.short_title = desired.short_title;
        self.email = desired.email;
        self.contacts = contacts.children;
        Ok(contacts.writes)
    }
}

/// Desired state of a workshop.
#[derive(Debug, Clone)]
pub struct WorkshopChanges {
    /// Workshop title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Desired contact list.
    pub contacts: Vec<Contact>,
}

/// A workshop run by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Workshop {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Optimistic concurrency token.
    pub version: i64,
    /// The provider running the workshop.
    pub provider_id: Uuid,
    /// Workshop title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
    /// Owned contacts.
    pub contacts: Vec<Contact>,
}

impl Workshop {
    /// Creates an empty, unsaved workshop shell.
    #[must_use]
    pub fn new(id: Uuid, provider_id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            provider_id,
            title: String::new(),
            description: String::new(),
            updated_at: None,
            contacts: Vec::new(),
        }
    }
}

impl AggregateRoot for Workshop {
    type Write = ChildWrite<Contact>;

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

impl ReconcilableAggregate for Workshop {
    type Desired = WorkshopChanges;

    fn reconcile(
        &mut self,
        desired: WorkshopChanges,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<ChildWrite<Contact>>, DomainError> {
        let contacts = contact_rules().reconcile(self.id, &self.contacts, desired.contacts, ids)?;

        self.title = desired.title;
        self.description = desired.description;
        self.contacts = contacts.children;
        Ok(contacts.writes)
    }
}

/// Desired state of a position.
#[derive(Debug, Clone)]
pub struct PositionChanges {
    /// Position name.
    pub full_title: String,
    /// Department the position belongs to.
    pub department: Option<String>,
    /// Desired contact list.
    pub contacts: Vec<Contact>,
}

/// A staff position advertised by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Optimistic concurrency token.
    pub version: i64,
    /// The provider offering the position.
    pub provider_id: Uuid,
    /// Position name.
    pub full_title: String,
    /// Department the position belongs to.
    pub department: Option<String>,
    /// Time of the latest committed change.
    pub updated_at: Option<DateTime<Utc>>,
    /// Owned contacts.
    pub contacts: Vec<Contact>,
}

impl Position {
    /// Creates an empty, unsaved position shell.
    #[must_use]
    pub fn new(id: Uuid, provider_id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            provider_id,
            full_title: String::new(),
            department: None,
            updated_at: None,
            contacts: Vec::new(),
        }
    }
}

impl AggregateRoot for Position {
    type Write = ChildWrite<Contact>;

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

impl ReconcilableAggregate for Position {
    type Desired = PositionChanges;

    fn reconcile(
        &mut self,
        desired: PositionChanges,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<ChildWrite<Contact>>, DomainError> {
        let contacts = contact_rules().reconcile(self.id, &self.contacts, desired.contacts, ids)?;

        self.full_title = desired.full_title;
        self.department = desired.department;
        self.contacts = contacts.children;
        Ok(contacts.writes)
    }
}

#[cfg(test)]
mod tests {
    use outofschool_test_support::SequenceIdGenerator;

    use super::*;
    use crate::domain::contacts::ADDRESS_REQUIRED;
    use crate::domain::contacts::fixtures::{contact, default_contact};

    fn stored_provider() -> Provider {
        let id = Uuid::new_v4();
        let mut provider = Provider::new(id);
        provider.version = 3;
        provider.full_title = "Sunrise Academy LLC".to_owned();
        provider.contacts = vec![
            Contact {
                id: Some(Uuid::new_v4()),
                owner_id: Some(id),
                ..contact("Overlap")
            },
            Contact {
                id: Some(Uuid::new_v4()),
                owner_id: Some(id),
                ..default_contact("OldStuff")
            },
        ];
        provider
    }

    #[test]
    fn test_provider_reconcile_replaces_scalars_and_contacts() {
        // Arrange
        let mut provider = stored_provider();
        let overlap_id = provider.contacts[0].id;
        let ids = SequenceIdGenerator::starting_at(10);
        let desired = ProviderChanges {
            full_title: "Sunrise Academy".to_owned(),
            short_title: "Sunrise".to_owned(),
            email: "hello@sunrise.example".to_owned(),
            contacts: vec![default_contact("Overlap"), contact("NewDto")],
        };

        // Act
        let writes = provider.reconcile(desired, &ids).unwrap();

        // Assert
        assert_eq!(provider.full_title, "Sunrise Academy");
        let shape: Vec<(&str, bool)> = provider
            .contacts
            .iter()
            .map(|c| (c.title.as_str(), c.is_default))
            .collect();
        assert_eq!(shape, vec![("Overlap", true), ("NewDto", false)]);
        assert_eq!(provider.contacts[0].id, overlap_id);
        assert_eq!(provider.contacts[1].id, Some(Uuid::from_u128(10)));
        assert_eq!(writes.len(), 3);
    }

    #[test]
    fn test_failed_reconcile_leaves_workshop_unchanged() {
        // Arrange
        let mut workshop = Workshop::new(Uuid::new_v4(), Uuid::new_v4());
        workshop.title = "Robotics".to_owned();
        let before = workshop.clone();
        let mut homeless = contact("Lab");
        homeless.address = None;
        let ids = SequenceIdGenerator::starting_at(1);

        // Act
        let result = workshop.reconcile(
            WorkshopChanges {
                title: "Robotics II".to_owned(),
                description: String::new(),
                contacts: vec![contact("Hall"), homeless],
            },
            &ids,
        );

        // Assert
        match result {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, ADDRESS_REQUIRED),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(workshop, before);
    }

    #[test]
    fn test_position_contacts_get_position_as_owner() {
        let position_id = Uuid::new_v4();
        let mut position = Position::new(position_id, Uuid::new_v4());
        let ids = SequenceIdGenerator::starting_at(1);

        position
            .reconcile(
                PositionChanges {
                    full_title: "Chess coach".to_owned(),
                    department: Some("Sports".to_owned()),
                    contacts: vec![contact("HR")],
                },
                &ids,
            )
            .unwrap();

        assert_eq!(position.contacts[0].owner_id, Some(position_id));
        assert!(position.contacts[0].is_default);
    }
}
