//! Aggregate persistence abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;

/// A single persistence command against an owned child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildWrite<C> {
    /// Insert a new child row.
    Create(C),
    /// Overwrite the mutable fields of an existing child row.
    Update(C),
    /// Remove an existing child row.
    Delete(C),
}

impl<C> ChildWrite<C> {
    /// Returns the child this write targets.
    pub fn child(&self) -> &C {
        match self {
            Self::Create(child) | Self::Update(child) | Self::Delete(child) => child,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Everything a store needs to persist one reconciliation atomically.
#[derive(Debug, Clone)]
pub struct UnitOfWork<A: AggregateRoot> {
    /// The aggregate in its new shape, version already advanced.
    pub aggregate: A,
    /// The version observed when the aggregate was loaded. Zero for inserts.
    pub expected_version: i64,
    /// Child writes in application order.
    pub writes: Vec<A::Write>,
}

impl<A: AggregateRoot> UnitOfWork<A> {
    /// Returns the aggregate identifier.
    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate.aggregate_id()
    }
}

/// Repository trait for loading and atomically persisting aggregates.
#[async_trait]
pub trait AggregateStore<A: AggregateRoot>: Send + Sync {
    /// Load an aggregate together with every child collection it owns.
    /// Returns `Ok(None)` when the id does not resolve.
    async fn load_with_children(&self, aggregate_id: Uuid) -> Result<Option<A>, DomainError>;

    /// Insert a brand-new aggregate and its children in one transaction.
    async fn insert(&self, unit: &UnitOfWork<A>) -> Result<(), DomainError>;

    /// Persist the scalar fields and child writes in one transaction,
    /// guarded by `expected_version`.
    ///
    /// Returns `DomainError::ConcurrencyConflict` when the stored version no
    /// longer matches or the aggregate has disappeared; nothing is written
    /// in that case.
    async fn commit(&self, unit: &UnitOfWork<A>) -> Result<(), DomainError>;
}
