//! Aggregate-level reconciliation: load, reconcile every owned collection,
//! and persist the result as one unit of work.

use outofschool_core::aggregate::AggregateRoot;
use outofschool_core::clock::Clock;
use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::{AggregateStore, UnitOfWork};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::guard::ConcurrencyGuard;

/// An aggregate whose owned collections can be reconciled toward a desired
/// state.
pub trait ReconcilableAggregate: AggregateRoot + PartialEq {
    /// The caller's desired state: scalar fields plus one incoming list per
    /// owned collection.
    type Desired: Send;

    /// Reconciles every owned collection, in a fixed order, and applies the
    /// desired scalar fields.
    ///
    /// Implementations must validate every collection before mutating
    /// `self`, so that an error leaves the aggregate exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when any collection violates its
    /// invariants.
    fn reconcile(
        &mut self,
        desired: Self::Desired,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<Self::Write>, DomainError>;
}

/// Runs reconciliations against an `AggregateStore`.
pub struct AggregateReconciler<'a, A: ReconcilableAggregate> {
    store: &'a dyn AggregateStore<A>,
    clock: &'a dyn Clock,
    ids: &'a dyn IdGenerator,
}

impl<'a, A: ReconcilableAggregate> AggregateReconciler<'a, A> {
    /// Creates a reconciler over `store`.
    pub fn new(
        store: &'a dyn AggregateStore<A>,
        clock: &'a dyn Clock,
        ids: &'a dyn IdGenerator,
    ) -> Self {
        Self { store, clock, ids }
    }

    /// Reconciles the children of a brand-new aggregate (there is no
    /// existing side) and inserts it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` before any write when the desired
    /// children are invalid, or the store's error when the insert fails.
    #[instrument(skip_all, fields(aggregate_id = %shell.aggregate_id()))]
    pub async fn create(&self, shell: A, desired: A::Desired) -> Result<A, DomainError> {
        let mut aggregate = shell;
        let writes = aggregate.reconcile(desired, self.ids)?;
        aggregate.set_version(1);
        aggregate.touch(self.clock.now());

        let unit = UnitOfWork {
            aggregate,
            expected_version: 0,
            writes,
        };
        self.store.insert(&unit).await?;

        info!(writes = unit.writes.len(), "aggregate created");
        Ok(unit.aggregate)
    }

    /// Reconciles the children of a persisted aggregate and commits the
    /// result atomically.
    ///
    /// When the desired state matches the stored one exactly, nothing is
    /// written and the stored aggregate is returned unchanged.
    ///
    /// # Errors
    ///
    /// - `DomainError::AggregateNotFound` when `aggregate_id` does not resolve.
    /// - `DomainError::ConcurrencyConflict` when `expected_version` is stale,
    ///   or the aggregate changed or vanished before commit.
    /// - `DomainError::Validation` when a collection violates its invariants.
    /// - `DomainError::Infrastructure` when the store fails; nothing is
    ///   committed.
    #[instrument(skip(self, desired), fields(aggregate_id = %aggregate_id))]
    pub async fn reconcile_existing(
        &self,
        aggregate_id: Uuid,
        expected_version: Option<i64>,
        desired: A::Desired,
    ) -> Result<A, DomainError> {
        let loaded = self.store.load_with_children(aggregate_id).await?;
        let snapshot = ConcurrencyGuard::new(expected_version).admit(aggregate_id, loaded)?;
        let observed = snapshot.version();

        let mut aggregate = snapshot.clone();
        let writes = aggregate.reconcile(desired, self.ids)?;
        if writes.is_empty() && aggregate == snapshot {
            debug!("desired state matches stored state; nothing to commit");
            return Ok(snapshot);
        }

        aggregate.set_version(observed + 1);
        aggregate.touch(self.clock.now());
        let unit = UnitOfWork {
            aggregate,
            expected_version: observed,
            writes,
        };

        if let Err(err) = self.store.commit(&unit).await {
            warn!(error = %err, "commit rejected");
            return Err(err);
        }

        info!(
            version = unit.aggregate.version(),
            writes = unit.writes.len(),
            "aggregate reconciled"
        );
        Ok(unit.aggregate)
    }
}
