//! Aggregate root abstraction.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Trait for aggregate roots that own child collections.
///
/// An aggregate is loaded together with its children, mutated in memory,
/// and persisted as a single unit of work.
pub trait AggregateRoot: Clone + Debug + Send + Sync {
    /// The child-level write command this aggregate emits, usually an enum
    /// with one `ChildWrite<C>` variant per owned collection.
    type Write: Clone + Debug + Send + Sync;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the optimistic concurrency token.
    fn version(&self) -> i64;

    /// Overwrites the optimistic concurrency token.
    fn set_version(&mut self, version: i64);

    /// Records the time of the latest modification.
    fn touch(&mut self, now: DateTime<Utc>);
}
