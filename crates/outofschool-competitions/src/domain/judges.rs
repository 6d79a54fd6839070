//! Judges and description items owned by a competitive event.
//!
//! Both collections are keyed by surrogate id: callers echo back the ids of
//! children they keep and omit the id for children they add.

use outofschool_reconcile::child::OwnedChild;
use outofschool_reconcile::collection::CollectionRules;
use outofschool_reconcile::invariants::{InvariantEnforcer, MarkerRule};
use outofschool_reconcile::key::KeyStrategy;
use uuid::Uuid;

/// Rejection message when more than one judge is marked chief.
pub const MULTIPLE_CHIEF_JUDGES: &str = "No more than one chief judge can be specified.";

/// A member of a competitive event's judging panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judge {
    /// Surrogate id.
    pub id: Option<Uuid>,
    /// The owning competitive event.
    pub competitive_event_id: Option<Uuid>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the judge chairs the panel.
    pub is_chief: bool,
    /// Short biography.
    pub description: String,
}

impl Judge {
    /// A new, unsaved judge.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            competitive_event_id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            is_chief: false,
            description: String::new(),
        }
    }

    fn is_chief(&self) -> bool {
        self.is_chief
    }

    fn set_chief(&mut self, is_chief: bool) {
        self.is_chief = is_chief;
    }
}

impl OwnedChild for Judge {
    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Option<Uuid>) {
        self.id = id;
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.competitive_event_id
    }

    fn set_owner_id(&mut self, owner_id: Uuid) {
        self.competitive_event_id = Some(owner_id);
    }

    fn overwrite_from(&mut self, incoming: &Self) {
        self.first_name.clone_from(&incoming.first_name);
        self.last_name.clone_from(&incoming.last_name);
        self.is_chief = incoming.is_chief;
        self.description.clone_from(&incoming.description);
    }
}

/// A titled section of a competitive event's description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionItem {
    /// Surrogate id.
    pub id: Option<Uuid>,
    /// The owning competitive event.
    pub competitive_event_id: Option<Uuid>,
    /// Section heading.
    pub section_name: String,
    /// Section body.
    pub description: String,
}

impl DescriptionItem {
    /// A new, unsaved description item.
    #[must_use]
    pub fn new(section_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            competitive_event_id: None,
            section_name: section_name.into(),
            description: description.into(),
        }
    }
}

impl OwnedChild for DescriptionItem {
    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Option<Uuid>) {
        self.id = id;
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.competitive_event_id
    }

    fn set_owner_id(&mut self, owner_id: Uuid) {
        self.competitive_event_id = Some(owner_id);
    }

    fn overwrite_from(&mut self, incoming: &Self) {
        self.section_name.clone_from(&incoming.section_name);
        self.description.clone_from(&incoming.description);
    }
}

/// Reconciliation rules for a judging panel.
#[must_use]
pub fn judge_rules() -> CollectionRules<Judge> {
    CollectionRules::new(
        "judges",
        KeyStrategy::SurrogateId,
        InvariantEnforcer::new().with_marker(MarkerRule::at_most_one(
            Judge::is_chief,
            Judge::set_chief,
            MULTIPLE_CHIEF_JUDGES,
        )),
    )
}

/// Reconciliation rules for description items.
#[must_use]
pub fn description_item_rules() -> CollectionRules<DescriptionItem> {
    CollectionRules::new(
        "description_items",
        KeyStrategy::SurrogateId,
        InvariantEnforcer::new(),
    )
}
