//! Per-collection reconciliation rules.

use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::child::OwnedChild;
use crate::invariants::InvariantEnforcer;
use crate::key::KeyStrategy;
use crate::planner::{AppliedCollection, deduplicate, plan};

/// Everything that distinguishes one owned collection from another: how its
/// children are keyed and which invariants they obey.
#[derive(Debug)]
pub struct CollectionRules<C> {
    name: &'static str,
    keys: KeyStrategy<C>,
    invariants: InvariantEnforcer<C>,
}

impl<C: OwnedChild> CollectionRules<C> {
    /// Creates the rules for a named collection.
    pub fn new(name: &'static str, keys: KeyStrategy<C>, invariants: InvariantEnforcer<C>) -> Self {
        Self {
            name,
            keys,
            invariants,
        }
    }

    /// The collection name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reconciles `existing` toward `incoming`.
    ///
    /// Pure: nothing outside the returned value is modified, so a caller
    /// reconciling several collections can validate all of them before
    /// applying any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the de-duplicated incoming set
    /// violates a marker or required-field invariant.
    pub fn reconcile(
        &self,
        owner_id: Uuid,
        existing: &[C],
        incoming: Vec<C>,
        ids: &dyn IdGenerator,
    ) -> Result<AppliedCollection<C>, DomainError> {
        let received = incoming.len();
        let mut desired = deduplicate(incoming, &self.keys);
        if desired.len() < received {
            debug!(
                collection = self.name,
                %owner_id,
                dropped = received - desired.len(),
                "dropped duplicate children"
            );
        }

        if let Err(err) = self.invariants.enforce(&mut desired) {
            warn!(collection = self.name, %owner_id, error = %err, "rejected desired collection");
            return Err(err);
        }

        let applied = plan(owner_id, existing, &desired, &self.keys).apply(ids);
        debug!(
            collection = self.name,
            %owner_id,
            created = applied.summary.created,
            updated = applied.summary.updated,
            deleted = applied.summary.deleted,
            unchanged = applied.summary.unchanged,
            "planned collection changes"
        );
        Ok(applied)
    }

    /// Reconciles the children of an aggregate that has never been persisted.
    ///
    /// # Errors
    ///
    /// Same as [`CollectionRules::reconcile`].
    pub fn reconcile_new(
        &self,
        owner_id: Uuid,
        incoming: Vec<C>,
        ids: &dyn IdGenerator,
    ) -> Result<AppliedCollection<C>, DomainError> {
        self.reconcile(owner_id, &[], incoming, ids)
    }
}
