//! Contacts owned by providers, workshops and positions.
//!
//! Callers never see contact ids for contacts they are about to add, so the
//! collection is matched on the trimmed contact title. Exactly one contact
//! is the default; when the caller marks none the first one is promoted.

use outofschool_reconcile::child::OwnedChild;
use outofschool_reconcile::collection::CollectionRules;
use outofschool_reconcile::invariants::{InvariantEnforcer, MarkerRule, Requirement};
use outofschool_reconcile::key::KeyStrategy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rejection message when more than one contact is marked default.
pub const MULTIPLE_DEFAULTS: &str = "Only one default contact can be specified.";
/// Rejection message for a contact without an address.
pub const ADDRESS_REQUIRED: &str = "Address must be specified for each contact.";
/// Rejection message for a contact without phone numbers.
pub const PHONE_REQUIRED: &str = "At least one phone number must be specified for each contact.";

/// Postal address of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// City or settlement.
    pub city: String,
    /// Street name.
    pub street: String,
    /// Building number, possibly with a letter suffix.
    pub building_number: String,
}

/// A phone number attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    /// The number as entered.
    pub number: String,
    /// Free-form label ("reception", "mobile").
    pub label: Option<String>,
}

/// A contact block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Surrogate id, `None` until persisted.
    pub id: Option<Uuid>,
    /// The provider, workshop or position owning this contact.
    pub owner_id: Option<Uuid>,
    /// Business key within the owner's contact list.
    pub title: String,
    /// Whether this is the owner's default contact.
    pub is_default: bool,
    /// Required postal address.
    pub address: Option<Address>,
    /// Required, non-empty list of phones.
    pub phones: Vec<Phone>,
    /// Optional e-mail addresses.
    pub emails: Vec<String>,
}

impl Contact {
    /// A new, unsaved contact.
    #[must_use]
    pub fn new(title: impl Into<String>, address: Option<Address>, phones: Vec<Phone>) -> Self {
        Self {
            id: None,
            owner_id: None,
            title: title.into(),
            is_default: false,
            address,
            phones,
            emails: Vec::new(),
        }
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_default(&self) -> bool {
        self.is_default
    }

    fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }
}

impl OwnedChild for Contact {
    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Option<Uuid>) {
        self.id = id;
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    fn set_owner_id(&mut self, owner_id: Uuid) {
        self.owner_id = Some(owner_id);
    }

    fn overwrite_from(&mut self, incoming: &Self) {
        incoming.title.trim().clone_into(&mut self.title);
        self.is_default = incoming.is_default;
        self.address.clone_from(&incoming.address);
        self.phones.clone_from(&incoming.phones);
        self.emails.clone_from(&incoming.emails);
    }
}

/// Reconciliation rules for every contact list.
#[must_use]
pub fn contact_rules() -> CollectionRules<Contact> {
    CollectionRules::new(
        "contacts",
        KeyStrategy::NaturalKey(Contact::title),
        InvariantEnforcer::new()
            .with_marker(MarkerRule::exactly_one_auto_promote(
                Contact::is_default,
                Contact::set_default,
                MULTIPLE_DEFAULTS,
            ))
            .require(Requirement::present(
                |c: &Contact| c.address.is_some(),
                ADDRESS_REQUIRED,
            ))
            .require(Requirement::non_empty(
                |c: &Contact| c.phones.len(),
                PHONE_REQUIRED,
            )),
    )
}


#[cfg(test)]
mod tests {
    use outofschool_core::error::DomainError;
    use outofschool_test_support::SequenceIdGenerator;

    use super::fixtures::{contact, default_contact, phone};
    use super::*;

    #[test]
    fn test_overwrite_keeps_identity() {
        // Arrange
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let mut stored = Contact {
            id: Some(id),
            owner_id: Some(owner),
            ..contact("Office")
        };
        let mut incoming = default_contact("Office");
        incoming.id = Some(Uuid::new_v4());
        incoming.owner_id = Some(Uuid::new_v4());
        incoming.phones.push(phone("+380500000000"));

        // Act
        stored.overwrite_from(&incoming);

        // Assert
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.owner_id, Some(owner));
        assert!(stored.is_default);
        assert_eq!(stored.phones.len(), 2);
    }

    #[test]
    fn test_padded_title_matches_stored_contact_without_writes() {
        // Arrange
        let owner = Uuid::new_v4();
        let stored = Contact {
            id: Some(Uuid::new_v4()),
            owner_id: Some(owner),
            ..default_contact("Office")
        };
        let ids = SequenceIdGenerator::starting_at(1);

        // Act
        let applied = contact_rules()
            .reconcile(
                owner,
                std::slice::from_ref(&stored),
                vec![default_contact(" Office ")],
                &ids,
            )
            .unwrap();

        // Assert
        assert!(applied.writes.is_empty());
        assert_eq!(applied.summary.unchanged, 1);
        assert_eq!(applied.children, vec![stored]);
    }

    #[test]
    fn test_titles_differing_in_whitespace_collapse() {
        let ids = SequenceIdGenerator::starting_at(1);

        let applied = contact_rules()
            .reconcile_new(
                Uuid::new_v4(),
                vec![contact("Office"), contact(" Office ")],
                &ids,
            )
            .unwrap();

        assert_eq!(applied.children.len(), 1);
    }

    #[test]
    fn test_missing_phone_is_rejected() {
        let ids = SequenceIdGenerator::starting_at(1);
        let mut silent = contact("Office");
        silent.phones.clear();

        let result = contact_rules().reconcile_new(Uuid::new_v4(), vec![silent], &ids);

        match result {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, PHONE_REQUIRED),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
